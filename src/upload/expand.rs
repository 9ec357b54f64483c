use crate::domain::PatternExpansion;
use crate::ports::PatternMatcher;
use std::path::PathBuf;
use tracing::debug;

/// Expand every pattern with `matcher`, keeping one entry per input pattern.
pub fn expand_patterns<S, M>(patterns: &[S], matcher: &M) -> Vec<PatternExpansion>
where
    S: AsRef<str>,
    M: PatternMatcher + ?Sized,
{
    patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            PatternExpansion {
                pattern: pattern.to_string(),
                result: matcher.matches(pattern),
            }
        })
        .collect()
}

/// Expand the given file names and patterns into a flat list of files.
///
/// Matches are concatenated in input order. A pattern the matcher cannot
/// expand contributes nothing and processing continues with the next one, so
/// callers can mix literal file names with globs that may not resolve.
pub fn expand_file_names<S, M>(patterns: &[S], matcher: &M) -> Vec<PathBuf>
where
    S: AsRef<str>,
    M: PatternMatcher + ?Sized,
{
    let mut expanded = Vec::with_capacity(patterns.len());

    for expansion in expand_patterns(patterns, matcher) {
        match expansion.result {
            Ok(matches) => expanded.extend(matches),
            Err(e) => debug!(pattern = %expansion.pattern, error = %e, "skipping pattern"),
        }
    }

    expanded
}
