//! The runner and wrapper pipelines, extracted from the binaries.
//!
//! Both are linear state machines over a [`ProcessHost`]: the first
//! nonzero exit code or I/O failure aborts the run, and nothing already
//! copied is rolled back.

use crate::ports::ProcessHost;
use crate::sandbox::{Sandbox, WRAPPER_SANDBOX_DIR, label_to_rel_path};
use crate::settings::{FormatSettings, WrapperSettings};
use anyhow::Context;
use bazelfmt_query::{SourceQuery, load_extensions_regex};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{debug, info};

/// Exit status equivalent of a C `return -1`, used for argument,
/// environment, and I/O errors.
pub const FAILURE_EXIT_CODE: u8 = 255;

/// Error type for pipeline results.
///
/// Subprocess failures carry the child's own exit code so the tool can
/// exit with it; everything else maps to [`FAILURE_EXIT_CODE`].
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{program} exited with code {code}")]
    Subprocess { program: String, code: i32 },
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    /// The exit code the process should terminate with.
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Subprocess { code, .. } => {
                u8::try_from(*code).unwrap_or(FAILURE_EXIT_CODE)
            }
            ToolError::Internal(_) => FAILURE_EXIT_CODE,
        }
    }
}

fn check(program: &Utf8Path, code: i32) -> Result<(), ToolError> {
    if code == 0 {
        Ok(())
    } else {
        Err(ToolError::Subprocess {
            program: program.to_string(),
            code,
        })
    }
}

/// Run the query-driven formatting pipeline.
///
/// Queries the build graph for formattable sources within the configured
/// scope, mirrors each one into the sandbox, formats the copy there, and
/// copies the result back over the original. The sandbox guarantees the
/// formatter sees exactly one configuration file no matter what else
/// lives in the workspace.
pub fn run_format(settings: &FormatSettings, host: &dyn ProcessHost) -> Result<(), ToolError> {
    let extensions = match &settings.extensions_manifest {
        Some(path) => load_extensions_regex(path)?,
        None => String::new(),
    };
    let query = SourceQuery {
        scope: settings.scope.clone(),
        kinds: settings.kinds.clone(),
        extensions,
    };

    debug!(query = %query.render(), "querying formattable sources");
    let (code, stdout) =
        host.run_capture(&settings.bazel, &query.to_args(), &settings.workspace_dir)?;
    check(&settings.bazel, code)?;

    let labels: Vec<&str> = stdout.lines().filter(|line| !line.is_empty()).collect();
    info!(count = labels.len(), "formatting sources");

    let sandbox = Sandbox::create(&settings.sandbox_dir, Some(&settings.config))?;

    for label in labels {
        let rel = label_to_rel_path(label);
        let staged = sandbox.stage(&settings.workspace_dir, &rel)?;

        let args = vec![
            "-style=file".to_string(),
            "-i".to_string(),
            staged.to_string(),
        ];
        let code = host.run(&settings.clang_format, &args, sandbox.root())?;
        check(&settings.clang_format, code)?;

        sandbox.restore(&settings.workspace_dir, &rel)?;
        debug!(source = %rel, "formatted");
    }

    Ok(())
}

/// Run the process-wrapper pipeline over an explicit file list.
///
/// Sources are staged into the fixed-name wrapper sandbox and formatted
/// there in a single formatter invocation. With a diff tool the run is
/// report-only: every staged copy is compared against its original after
/// formatting. Without one, results stay in the sandbox: unlike the
/// runner, this path never copies back, and callers treat the sandbox as
/// the output.
pub fn run_wrapper(settings: &WrapperSettings, host: &dyn ProcessHost) -> Result<(), ToolError> {
    let sandbox_root = settings.invocation_dir.join(WRAPPER_SANDBOX_DIR);
    let sandbox = Sandbox::create(&sandbox_root, settings.config_file.as_deref())?;

    // With a diff tool, queue one comparison per source instead of ever
    // touching the originals.
    let mut diff_commands: Vec<Vec<String>> = Vec::new();
    for source in &settings.sources {
        let staged = sandbox.stage(&settings.invocation_dir, source)?;
        if settings.diff_tool.is_some() {
            diff_commands.push(vec![source.to_string(), staged.to_string()]);
        }
    }

    // The formatter path may be relative to the invocation directory;
    // running inside the sandbox requires absolutizing it first.
    let formatter = absolutize(&settings.formatter, &settings.invocation_dir);

    let mut args = settings.formatter_args.clone();
    args.extend(settings.sources.iter().map(|source| source.to_string()));

    debug!(%formatter, sources = settings.sources.len(), "running formatter in sandbox");
    let code = host.run(&formatter, &args, sandbox.root())?;
    check(&formatter, code)?;

    if let Some(diff_tool) = &settings.diff_tool {
        // Every comparison runs; the first nonzero exit code becomes the
        // step's failure.
        let mut first_failure = 0;
        for pair in &diff_commands {
            let code = host.run(diff_tool, pair, &settings.invocation_dir)?;
            if first_failure == 0 {
                first_failure = code;
            }
        }
        check(diff_tool, first_failure)?;
    }

    if let Some(touch_file) = &settings.touch_file {
        fs::write(touch_file.as_std_path(), b"")
            .with_context(|| format!("create touch file {touch_file}"))
            .map_err(ToolError::Internal)?;
        debug!(%touch_file, "created completion marker");
    }

    Ok(())
}

fn absolutize(path: &Utf8Path, base: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
