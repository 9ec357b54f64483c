use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Error reading OAuth token: {0}")]
    CredentialLoad(String),

    #[error("Pattern '{pattern}' could not be expanded: {reason}")]
    PatternExpansion { pattern: String, reason: String },

    #[error("Unable to read '{}': {}", .path.display(), .source)]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Error, must upload at least 1 file at a time (got {0})")]
    InvalidConcurrency(usize),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl UploadError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
