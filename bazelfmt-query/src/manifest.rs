use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use tracing::debug;

/// Render extension-manifest contents into a regex alternation fragment.
///
/// Line terminators become `|` and a literal `+` is escaped as `\+`, the
/// only extension character that needs escaping in the query engine's
/// regex dialect. A manifest that ends with a line terminator yields a
/// trailing `|`; callers tolerate that rather than correct it.
pub fn extensions_to_regex(contents: &str) -> String {
    contents.replace('\n', "|").replace('+', "\\+")
}

/// Load an extensions manifest from disk and render it.
pub fn load_extensions_regex(path: &Utf8Path) -> anyhow::Result<String> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read extensions manifest {path}"))?;
    let fragment = extensions_to_regex(&contents);
    debug!(%path, %fragment, "loaded extensions manifest");
    Ok(fragment)
}
