use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;

/// Copy `src` to `dest` byte-for-byte, creating any missing parent
/// directories of `dest` first. An existing `dest` is overwritten.
///
/// Partial directory creation is not rolled back when a later step fails.
pub fn copy_file(src: &Utf8Path, dest: &Utf8Path) -> anyhow::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create parent dirs for {dest}"))?;
    }
    fs::copy(src.as_std_path(), dest.as_std_path())
        .with_context(|| format!("copy {src} to {dest}"))?;
    Ok(())
}
