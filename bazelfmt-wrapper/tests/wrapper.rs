//! End-to-end tests for the process wrapper against stub formatter and
//! diff executables.

#![cfg(unix)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn wrapper() -> Command {
    Command::cargo_bin("bazelfmt-wrapper").expect("bazelfmt-wrapper binary")
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod script");
}

struct Fixture {
    _temp: TempDir,
    invoke_dir: PathBuf,
    formatter: PathBuf,
    diff_tool: PathBuf,
}

/// An invocation directory with two sources, a formatter stub that
/// appends a marker line to every file it is handed, and a diff stub
/// comparing its two arguments byte for byte.
fn fixture() -> Fixture {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();

    let invoke_dir = root.join("exec");
    fs::create_dir_all(invoke_dir.join("lib")).expect("mkdir exec");
    fs::write(invoke_dir.join("lib").join("a.cpp"), "int a;\n").expect("write a.cpp");
    fs::write(invoke_dir.join("lib").join("b.cpp"), "int b;\n").expect("write b.cpp");

    let formatter = root.join("fake-formatter");
    write_script(
        &formatter,
        "#!/bin/sh\nfor f in \"$@\"; do printf '// formatted\\n' >> \"$f\"; done\n",
    );

    let diff_tool = root.join("fake-diff");
    write_script(&diff_tool, "#!/bin/sh\ncmp -s \"$1\" \"$2\"\n");

    Fixture {
        _temp: temp,
        invoke_dir,
        formatter,
        diff_tool,
    }
}

fn run(fixture: &Fixture) -> Command {
    let mut cmd = wrapper();
    cmd.current_dir(&fixture.invoke_dir);
    cmd
}

#[test]
fn duplicate_touch_file_is_fatal_and_creates_nothing() {
    let fixture = fixture();
    let marker_x = fixture.invoke_dir.join("x");
    run(&fixture)
        .args(["--touch-file", "x", "--touch-file", "y", "--", "fmt"])
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("cannot be used multiple times"));
    assert!(!marker_x.exists());
}

#[test]
fn duplicate_diff_tool_is_fatal() {
    let fixture = fixture();
    run(&fixture)
        .args(["--diff-tool-file", "d", "--diff-tool-file", "d", "--", "fmt"])
        .assert()
        .failure()
        .code(255);
}

#[test]
fn duplicate_config_file_is_fatal() {
    let fixture = fixture();
    run(&fixture)
        .args(["--config-file", "c", "--config-file", "c", "--", "fmt"])
        .assert()
        .failure()
        .code(255);
}

#[test]
fn missing_option_value_is_fatal() {
    let fixture = fixture();
    run(&fixture)
        .arg("--touch-file")
        .assert()
        .failure()
        .code(255);
}

#[test]
fn unknown_argument_is_fatal() {
    let fixture = fixture();
    run(&fixture)
        .args(["--frobnicate", "x", "--", "fmt"])
        .assert()
        .failure()
        .code(255);
}

#[test]
fn non_diff_mode_formats_the_staged_copies_only() {
    let fixture = fixture();
    run(&fixture)
        .args(["--source-file", "lib/a.cpp", "--source-file", "lib/b.cpp"])
        .args(["--", fixture.formatter.to_str().expect("utf8")])
        .assert()
        .success();

    // Formatting happened in the sandbox; this mode never copies back.
    let sandbox = fixture.invoke_dir.join("__clang_format__");
    let staged = fs::read_to_string(sandbox.join("lib").join("a.cpp")).expect("read staged");
    assert_eq!(staged, "int a;\n// formatted\n");

    let original =
        fs::read_to_string(fixture.invoke_dir.join("lib").join("a.cpp")).expect("read original");
    assert_eq!(original, "int a;\n");
}

#[test]
fn config_file_is_installed_before_formatting() {
    let fixture = fixture();
    let config = fixture.invoke_dir.join("style");
    fs::write(&config, "BasedOnStyle: LLVM\n").expect("write config");

    // This stub fails unless the sandbox already holds its config.
    write_script(
        &fixture.formatter,
        "#!/bin/sh\ntest -f .clang-format || exit 9\n",
    );

    run(&fixture)
        .args(["--config-file", "style", "--source-file", "lib/a.cpp"])
        .args(["--", fixture.formatter.to_str().expect("utf8")])
        .assert()
        .success();
}

#[test]
fn diff_mode_passes_when_formatting_changes_nothing() {
    let fixture = fixture();
    write_script(&fixture.formatter, "#!/bin/sh\nexit 0\n");

    let marker = fixture.invoke_dir.join("marker");
    run(&fixture)
        .args(["--touch-file", "marker"])
        .args(["--diff-tool-file", fixture.diff_tool.to_str().expect("utf8")])
        .args(["--source-file", "lib/a.cpp", "--source-file", "lib/b.cpp"])
        .args(["--", fixture.formatter.to_str().expect("utf8")])
        .assert()
        .success();

    // Identical copies: diffs all passed, marker exists and is empty,
    // originals untouched.
    assert_eq!(fs::metadata(&marker).expect("marker metadata").len(), 0);
    let original =
        fs::read_to_string(fixture.invoke_dir.join("lib").join("a.cpp")).expect("read original");
    assert_eq!(original, "int a;\n");
}

#[test]
fn diff_mode_fails_when_formatting_would_change_a_file() {
    let fixture = fixture();

    let marker = fixture.invoke_dir.join("marker");
    run(&fixture)
        .args(["--touch-file", "marker"])
        .args(["--diff-tool-file", fixture.diff_tool.to_str().expect("utf8")])
        .args(["--source-file", "lib/a.cpp"])
        .args(["--", fixture.formatter.to_str().expect("utf8")])
        .assert()
        .failure()
        .code(1);

    assert!(!marker.exists());
    let original =
        fs::read_to_string(fixture.invoke_dir.join("lib").join("a.cpp")).expect("read original");
    assert_eq!(original, "int a;\n");
}

#[test]
fn formatter_exit_code_is_propagated_and_marker_withheld() {
    let fixture = fixture();
    write_script(&fixture.formatter, "#!/bin/sh\nexit 3\n");

    let marker = fixture.invoke_dir.join("marker");
    run(&fixture)
        .args(["--touch-file", "marker"])
        .args(["--source-file", "lib/a.cpp"])
        .args(["--", fixture.formatter.to_str().expect("utf8")])
        .assert()
        .failure()
        .code(3);

    assert!(!marker.exists());
}

#[test]
fn formatter_receives_trailing_args_then_sources() {
    let fixture = fixture();

    // Record the exact argv the formatter sees.
    write_script(
        &fixture.formatter,
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > argv.txt\n",
    );

    run(&fixture)
        .args(["--source-file", "lib/a.cpp", "--source-file", "lib/b.cpp"])
        .args([
            "--",
            fixture.formatter.to_str().expect("utf8"),
            "-style=file",
            "-i",
        ])
        .assert()
        .success();

    // argv.txt lands in the sandbox, where the formatter runs.
    let argv = fs::read_to_string(
        fixture
            .invoke_dir
            .join("__clang_format__")
            .join("argv.txt"),
    )
    .expect("read argv.txt");
    assert_eq!(argv, "-style=file\n-i\nlib/a.cpp\nlib/b.cpp\n");
}
