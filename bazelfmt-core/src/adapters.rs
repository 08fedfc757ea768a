//! Default implementations of the port traits.

use crate::ports::{ProcessHost, RunfileResolver};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::HashMap;
use tracing::debug;

/// Subprocess execution via `bazelfmt-util`.
#[derive(Debug, Clone, Default)]
pub struct ShellHost;

impl ProcessHost for ShellHost {
    fn run(&self, program: &Utf8Path, args: &[String], cwd: &Utf8Path) -> anyhow::Result<i32> {
        bazelfmt_util::run(program, args, cwd)
    }

    fn run_capture(
        &self,
        program: &Utf8Path,
        args: &[String],
        cwd: &Utf8Path,
    ) -> anyhow::Result<(i32, String)> {
        bazelfmt_util::run_capture(program, args, cwd)
    }
}

/// Bazel runfiles discovery.
///
/// Resolution order matches the conventional runfiles libraries:
/// `RUNFILES_MANIFEST_FILE` entries first, then a lookup under
/// `RUNFILES_DIR`, then an `<argv0>.runfiles` directory next to the
/// executable. A path that resolves nowhere is returned unchanged so
/// direct invocations outside Bazel keep working with plain paths.
#[derive(Debug, Clone)]
pub struct BazelRunfiles {
    manifest: HashMap<String, Utf8PathBuf>,
    runfiles_dir: Option<Utf8PathBuf>,
    workspace_name: String,
}

impl BazelRunfiles {
    /// Discover runfiles for the current process.
    ///
    /// `argv0` is the program path the process was invoked as;
    /// `workspace_name` is the repository name runfile paths are keyed
    /// under.
    pub fn discover(argv0: &Utf8Path, workspace_name: &str) -> anyhow::Result<Self> {
        let mut manifest = HashMap::new();
        if let Ok(manifest_path) = std::env::var("RUNFILES_MANIFEST_FILE") {
            let contents = fs::read_to_string(&manifest_path)
                .with_context(|| format!("read runfiles manifest {manifest_path}"))?;
            manifest = Self::parse_manifest(&contents);
            debug!(path = %manifest_path, entries = manifest.len(), "loaded runfiles manifest");
        }

        let runfiles_dir = std::env::var("RUNFILES_DIR")
            .ok()
            .map(Utf8PathBuf::from)
            .or_else(|| {
                let sibling = Utf8PathBuf::from(format!("{argv0}.runfiles"));
                sibling.is_dir().then_some(sibling)
            });

        Ok(Self {
            manifest,
            runfiles_dir,
            workspace_name: workspace_name.to_string(),
        })
    }

    /// Parse `logical-path actual-path` manifest lines. Malformed lines
    /// are skipped.
    fn parse_manifest(contents: &str) -> HashMap<String, Utf8PathBuf> {
        contents
            .lines()
            .filter_map(|line| {
                let (logical, actual) = line.split_once(' ')?;
                (!logical.is_empty() && !actual.is_empty())
                    .then(|| (logical.to_string(), Utf8PathBuf::from(actual)))
            })
            .collect()
    }
}

impl RunfileResolver for BazelRunfiles {
    fn resolve(&self, logical: &str) -> anyhow::Result<Utf8PathBuf> {
        let key = format!("{}/{}", self.workspace_name, logical);

        if let Some(actual) = self.manifest.get(&key) {
            debug!(%logical, %actual, "resolved runfile via manifest");
            return Ok(actual.clone());
        }

        if let Some(dir) = &self.runfiles_dir {
            let candidate = dir.join(&key);
            if candidate.exists() {
                debug!(%logical, actual = %candidate, "resolved runfile via runfiles dir");
                return Ok(candidate);
            }
        }

        debug!(%logical, "runfile not found, using path as-is");
        Ok(Utf8PathBuf::from(logical))
    }
}
