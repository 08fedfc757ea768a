use anyhow::Context;
use camino::Utf8Path;
use std::io::Read;
use std::process::{Command, Stdio};
use tracing::debug;

/// Exit code reported for a child terminated by a signal, which has no
/// exit status of its own.
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// Run `program` with `args` inside `cwd`, inheriting stdio.
///
/// Returns the child's exit code. Spawn failures (missing executable,
/// missing `cwd`) are errors; a nonzero child exit is not.
pub fn run(program: &Utf8Path, args: &[String], cwd: &Utf8Path) -> anyhow::Result<i32> {
    debug!(%program, ?args, %cwd, "spawning");
    let status = Command::new(program.as_std_path())
        .args(args)
        .current_dir(cwd.as_std_path())
        .status()
        .with_context(|| format!("spawn {program} in {cwd}"))?;
    Ok(status.code().unwrap_or(SIGNALED_EXIT_CODE))
}

/// Run `program` with `args` inside `cwd`, capturing stdout.
///
/// The stdout pipe is drained to completion before waiting on the child,
/// so a chatty child can never fill the pipe and deadlock. Stderr stays
/// inherited.
pub fn run_capture(
    program: &Utf8Path,
    args: &[String],
    cwd: &Utf8Path,
) -> anyhow::Result<(i32, String)> {
    debug!(%program, ?args, %cwd, "spawning with captured stdout");
    let mut child = Command::new(program.as_std_path())
        .args(args)
        .current_dir(cwd.as_std_path())
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {program} in {cwd}"))?;

    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_string(&mut stdout)
            .with_context(|| format!("read stdout of {program}"))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("wait for {program}"))?;
    Ok((status.code().unwrap_or(SIGNALED_EXIT_CODE), stdout))
}
