/// Tags that opt a target out of formatting. Matched as delimited tags
/// inside Bazel's rendered tag list, not as substrings.
pub const OPT_OUT_TAGS: [&str; 3] = ["noformat", "no-format", "no-clang-format"];

/// A query for every formattable source file reachable from a scope.
///
/// Renders to a single `bazel query` expression: source files whose
/// extension matches `extensions`, among the direct dependencies of
/// targets whose rule kind matches `kinds` within `scope`, excluding
/// targets carrying an opt-out tag.
///
/// Each field is substituted exactly once by `format!`, so no
/// placeholder expansion can ever be re-matched by a later substitution.
#[derive(Debug, Clone)]
pub struct SourceQuery {
    /// Space-separated target patterns bounding the traversal.
    pub scope: String,
    /// Regex of rule kinds to gather source dependencies from.
    pub kinds: String,
    /// Regex alternation fragment of formattable extensions.
    pub extensions: String,
}

impl SourceQuery {
    /// Render the query expression.
    pub fn render(&self) -> String {
        let Self {
            scope,
            kinds,
            extensions,
        } = self;
        let opt_out = OPT_OUT_TAGS.join("|");
        format!(
            r"filter('^//.*\.({extensions})$', kind('source file', deps(kind('{kinds}', set({scope}) except attr(tags, '(^\[|, )({opt_out})(, |\]$)', set({scope}))), 1)))"
        )
    }

    /// Full argv for the query subprocess. `--keep_going` lets the engine
    /// continue past unrelated errors; `--noimplicit_deps` keeps
    /// implicit/toolchain dependencies out of the traversal so only
    /// first-party declared sources are formatted.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "query".to_string(),
            self.render(),
            "--keep_going".to_string(),
            "--noimplicit_deps".to_string(),
        ]
    }
}
