//! Sandbox staging for formatter isolation.
//!
//! clang-format discovers its configuration by walking up from the file
//! being formatted, so sources are mirrored into a private directory tree
//! seeded with exactly one `.clang-format` before the first source copy.
//! The mirrored tree keeps each file's workspace-relative position, so
//! relative lookups inside the formatter behave as if it ran at the
//! workspace root.

use anyhow::Context;
use bazelfmt_util::copy_file;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

/// File name clang-format expects its configuration under.
pub const CONFIG_FILE_NAME: &str = ".clang-format";

/// Sandbox directory the runner creates under its invocation directory.
pub const RUNNER_SANDBOX_DIR: &str = ".clang_format_workdir";

/// Fixed-name sandbox directory used by the process wrapper.
pub const WRAPPER_SANDBOX_DIR: &str = "__clang_format__";

/// Translate a source-file target label into a workspace-relative path.
///
/// `//lib:b/c.cpp` maps to `lib/b/c.cpp`: the root marker is stripped
/// and the package separator becomes a path separator. Pure path
/// arithmetic; file contents are never consulted.
pub fn label_to_rel_path(label: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(label.replace("//", "").replace(':', "/"))
}

/// A private directory tree sources are staged into around a formatter
/// run.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: Utf8PathBuf,
}

impl Sandbox {
    /// Create the sandbox root and, when given, install `config` as its
    /// `.clang-format`. The config is in place before any source can be
    /// staged.
    pub fn create(root: &Utf8Path, config: Option<&Utf8Path>) -> anyhow::Result<Self> {
        fs::create_dir_all(root).with_context(|| format!("create sandbox {root}"))?;
        let sandbox = Self {
            root: root.to_owned(),
        };
        if let Some(config) = config {
            copy_file(config, &sandbox.root.join(CONFIG_FILE_NAME))
                .with_context(|| format!("install formatter config from {config}"))?;
        }
        Ok(sandbox)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Sandbox-side path of a workspace-relative source path.
    pub fn path_of(&self, rel: &Utf8Path) -> Utf8PathBuf {
        self.root.join(rel)
    }

    /// Mirror `source_root/rel` into the sandbox at the same relative
    /// path. Returns the staged path.
    pub fn stage(&self, source_root: &Utf8Path, rel: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
        let staged = self.path_of(rel);
        copy_file(&source_root.join(rel), &staged)?;
        Ok(staged)
    }

    /// Copy a (formatted) sandbox file back over the original.
    pub fn restore(&self, source_root: &Utf8Path, rel: &Utf8Path) -> anyhow::Result<()> {
        copy_file(&self.path_of(rel), &source_root.join(rel))
    }
}
