use anyhow::Context;
use bazelfmt_core::adapters::{BazelRunfiles, ShellHost};
use bazelfmt_core::pipeline::{FAILURE_EXIT_CODE, ToolError, run_format};
use bazelfmt_core::ports::RunfileResolver;
use bazelfmt_core::sandbox::RUNNER_SANDBOX_DIR;
use bazelfmt_core::settings::FormatSettings;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Repository name runfile paths are keyed under; the main repository is
/// `_main` under bzlmod.
const WORKSPACE_NAME: &str = "_main";

/// Scope used when the `--` separator is present with nothing after it.
const DEFAULT_SCOPE: &str = "//...:all";

#[derive(Debug, Parser)]
#[command(
    name = "bazelfmt",
    version,
    about = "Formats Bazel-reachable sources with clang-format inside an isolated sandbox."
)]
struct Cli {
    /// clang-format executable, as a workspace-relative runfile path.
    #[arg(long = "clang_format", default_value = "clang-format")]
    clang_format: String,

    /// Configuration file installed into the sandbox as `.clang-format`.
    #[arg(long)]
    config: String,

    /// Manifest listing formattable file extensions, one per line.
    #[arg(long = "extensions_manifest")]
    extensions_manifest: Option<String>,

    /// Regex of rule kinds to gather source dependencies from.
    #[arg(long, default_value = "")]
    types: String,

    /// Bazel executable; the bazel wrapper script sets BAZEL_REAL.
    #[arg(long, env = "BAZEL_REAL", default_value = "bazel", hide = true)]
    bazel: Utf8PathBuf,

    /// Workspace directory, set by `bazel run`.
    #[arg(long, env = "BUILD_WORKSPACE_DIRECTORY", hide = true)]
    workspace_dir: Option<Utf8PathBuf>,

    /// Target patterns bounding what gets formatted.
    #[arg(last = true)]
    scope: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parsing happens before anything else; a bad invocation must leave
    // no side effects behind.
    let argv: Vec<String> = std::env::args().collect();
    let has_separator = argv.iter().any(|arg| arg == "--");
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(FAILURE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match real_main(cli, &argv, has_separator) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn real_main(cli: Cli, argv: &[String], has_separator: bool) -> Result<(), ToolError> {
    let settings = build_settings(cli, argv, has_separator).map_err(ToolError::Internal)?;
    run_format(&settings, &ShellHost)
}

fn build_settings(
    cli: Cli,
    argv: &[String],
    has_separator: bool,
) -> anyhow::Result<FormatSettings> {
    let workspace_dir = cli.workspace_dir.context(
        "BUILD_WORKSPACE_DIRECTORY is not set; is bazelfmt running under `bazel run`?",
    )?;

    // A bare `--` means "everything"; no separator at all means the
    // caller forgot the scope entirely.
    let scope = if !cli.scope.is_empty() {
        cli.scope.join(" ")
    } else if has_separator {
        DEFAULT_SCOPE.to_string()
    } else {
        anyhow::bail!("missing required scope; pass target patterns after `--`");
    };

    let argv0 = argv.first().map(String::as_str).unwrap_or("bazelfmt");
    let runfiles = BazelRunfiles::discover(Utf8Path::new(argv0), WORKSPACE_NAME)?;
    let config = runfiles.resolve(&cli.config)?;
    let clang_format = runfiles.resolve(&cli.clang_format)?;
    let extensions_manifest = cli
        .extensions_manifest
        .as_deref()
        .map(|path| runfiles.resolve(path))
        .transpose()?;

    let cwd = std::env::current_dir().context("get working directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|path| anyhow::anyhow!("working directory {} is not UTF-8", path.display()))?;

    Ok(FormatSettings {
        bazel: cli.bazel,
        workspace_dir,
        clang_format,
        config,
        extensions_manifest,
        kinds: cli.types,
        scope,
        sandbox_dir: cwd.join(RUNNER_SANDBOX_DIR),
    })
}
