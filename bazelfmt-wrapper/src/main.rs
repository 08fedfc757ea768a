use anyhow::Context;
use bazelfmt_core::adapters::ShellHost;
use bazelfmt_core::pipeline::{FAILURE_EXIT_CODE, ToolError, run_wrapper};
use bazelfmt_core::settings::WrapperSettings;
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "bazelfmt-wrapper",
    version,
    about = "Stages explicit source files into a sandbox and runs a formatter over them."
)]
struct Cli {
    /// Marker file created empty on success, for build-system caching.
    #[arg(long)]
    touch_file: Option<Utf8PathBuf>,

    /// Diff tool run as `tool <original> <staged copy>` per source,
    /// turning the invocation into a report-only check.
    #[arg(long)]
    diff_tool_file: Option<Utf8PathBuf>,

    /// Configuration file installed into the sandbox as `.clang-format`.
    #[arg(long)]
    config_file: Option<Utf8PathBuf>,

    /// Source file to stage and format; repeatable.
    #[arg(long)]
    source_file: Vec<Utf8PathBuf>,

    /// Formatter executable followed by its arguments.
    #[arg(last = true, required = true, num_args = 1..)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parsing happens before anything else; a bad invocation must leave
    // no side effects behind, in particular no touch file.
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

    match real_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn real_main(cli: Cli) -> Result<(), ToolError> {
    let settings = build_settings(cli).map_err(ToolError::Internal)?;
    run_wrapper(&settings, &ShellHost)
}

fn build_settings(cli: Cli) -> anyhow::Result<WrapperSettings> {
    let mut command = cli.command.into_iter();
    let formatter = command
        .next()
        .map(Utf8PathBuf::from)
        .context("missing formatter executable after `--`")?;
    let formatter_args: Vec<String> = command.collect();

    let invocation_dir = std::env::current_dir().context("get working directory")?;
    let invocation_dir = Utf8PathBuf::from_path_buf(invocation_dir)
        .map_err(|path| anyhow::anyhow!("working directory {} is not UTF-8", path.display()))?;

    Ok(WrapperSettings {
        invocation_dir,
        formatter,
        formatter_args,
        config_file: cli.config_file,
        diff_tool: cli.diff_tool_file,
        sources: cli.source_file,
        touch_file: cli.touch_file,
    })
}
