//! Query construction for formattable sources.
//!
//! Two pieces: the extension-manifest loader, which renders a
//! newline-separated list of file extensions into a regex alternation
//! fragment, and [`SourceQuery`], which renders the full `bazel query`
//! expression selecting formattable source files within a scope.

mod manifest;
mod query;

pub use manifest::{extensions_to_regex, load_extensions_regex};
pub use query::{OPT_OUT_TAGS, SourceQuery};
