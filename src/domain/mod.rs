use crate::errors::UploadError;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// OAuth access token and secret for the account doing the upload.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token)
            .field("secret", &"****")
            .finish()
    }
}

/// One file headed for one album.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTarget {
    pub album_key: String,
    pub path: PathBuf,
}

impl UploadTarget {
    pub fn new(album_key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            album_key: album_key.into(),
            path: path.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDigest {
    pub md5_hex: String,
    pub size_bytes: u64,
}

/// Where the request body comes from. The transport streams exactly
/// `content_length` bytes of `path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadBody {
    pub path: PathBuf,
    pub content_length: u64,
}

#[derive(Clone, Debug)]
pub struct SignedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: UploadBody,
}

/// Status line and raw body text returned by the upload endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOutcome {
    pub status_line: String,
    pub body: String,
}

/// Result of expanding one input pattern.
#[derive(Debug)]
pub struct PatternExpansion {
    pub pattern: String,
    pub result: Result<Vec<PathBuf>, UploadError>,
}

impl PatternExpansion {
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.result.as_ref().map_or(0, Vec::len)
    }
}
