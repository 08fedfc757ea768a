//! Clap-free settings for the format and wrapper pipelines.

use camino::Utf8PathBuf;

/// Settings for the runner pipeline (query → sandbox → format → copy back).
///
/// All paths are expected to be resolved already: runfile indirection is
/// the CLI's concern, not the pipeline's.
#[derive(Debug, Clone)]
pub struct FormatSettings {
    /// Bazel executable (`BAZEL_REAL`, falling back to `bazel`).
    pub bazel: Utf8PathBuf,

    /// Absolute path to the workspace being formatted
    /// (`BUILD_WORKSPACE_DIRECTORY`).
    pub workspace_dir: Utf8PathBuf,

    /// clang-format executable.
    pub clang_format: Utf8PathBuf,

    /// Configuration file installed into the sandbox as `.clang-format`.
    pub config: Utf8PathBuf,

    /// Manifest of formattable extensions, one per line. When absent the
    /// extension filter matches nothing and the run is a no-op.
    pub extensions_manifest: Option<Utf8PathBuf>,

    /// Regex of rule kinds to gather source dependencies from.
    pub kinds: String,

    /// Space-separated target patterns bounding what gets formatted.
    pub scope: String,

    /// Sandbox root the sources are staged into.
    pub sandbox_dir: Utf8PathBuf,
}

/// Settings for the process-wrapper pipeline (explicit file list).
#[derive(Debug, Clone)]
pub struct WrapperSettings {
    /// Directory the wrapper was invoked from. The sandbox, the source
    /// paths, and the diff commands are all anchored here.
    pub invocation_dir: Utf8PathBuf,

    /// Formatter executable, possibly relative to `invocation_dir`.
    pub formatter: Utf8PathBuf,

    /// Formatter arguments; every source path is appended after these.
    pub formatter_args: Vec<String>,

    /// Configuration file installed into the sandbox, if any.
    pub config_file: Option<Utf8PathBuf>,

    /// Diff tool run as `tool <original> <staged>` per source. Turns the
    /// invocation into a report-only check.
    pub diff_tool: Option<Utf8PathBuf>,

    /// Source files to stage, relative to `invocation_dir`.
    pub sources: Vec<Utf8PathBuf>,

    /// Marker file created empty on success.
    pub touch_file: Option<Utf8PathBuf>,
}
