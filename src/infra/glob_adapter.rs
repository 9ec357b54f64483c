use crate::errors::UploadError;
use crate::ports::PatternMatcher;
use std::path::PathBuf;

/// Filesystem glob matching. Literal paths behave like patterns with no
/// wildcards: they match themselves if they exist and nothing otherwise.
pub struct GlobMatcher;

impl PatternMatcher for GlobMatcher {
    fn matches(&self, pattern: &str) -> Result<Vec<PathBuf>, UploadError> {
        let paths = glob::glob(pattern).map_err(|e| UploadError::PatternExpansion {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        // Entries that cannot be read while walking are dropped, not fatal.
        Ok(paths.filter_map(Result::ok).collect())
    }
}
