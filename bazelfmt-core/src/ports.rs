//! Port traits abstracting subprocess and runfile I/O away from the
//! pipelines.

use camino::{Utf8Path, Utf8PathBuf};

/// Synchronous subprocess execution.
///
/// The working directory is an explicit parameter of every call; no
/// implementation may mutate the process-global working directory.
pub trait ProcessHost {
    /// Run a program in `cwd`, inheriting stdio. Returns the exit code.
    fn run(&self, program: &Utf8Path, args: &[String], cwd: &Utf8Path) -> anyhow::Result<i32>;

    /// Run a program in `cwd`, capturing stdout. Returns the exit code
    /// and everything the child wrote to stdout.
    fn run_capture(
        &self,
        program: &Utf8Path,
        args: &[String],
        cwd: &Utf8Path,
    ) -> anyhow::Result<(i32, String)>;
}

/// Maps a logical, workspace-relative resource path to an on-disk path.
///
/// The resolver is a collaborator the pipelines assume correct; the CLI
/// applies it to its runfile arguments before building settings.
pub trait RunfileResolver {
    fn resolve(&self, logical: &str) -> anyhow::Result<Utf8PathBuf>;
}
