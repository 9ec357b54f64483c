//! Service client configuration.
//!
//! The file is JSON, for example:
//!
//! ```json
//! {
//!   "consumer_key": "abc",
//!   "consumer_secret": "def",
//!   "base_headers": { "User-Agent": "my-uploader/1.0" }
//! }
//! ```

use crate::errors::UploadError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "https://upload.smugmug.com/";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    /// Sent with every upload, before the upload-specific headers.
    #[serde(default = "default_base_headers")]
    pub base_headers: BTreeMap<String, String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Whole-request deadline; unset means large files may take as long as they need.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_upload_url() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

fn default_base_headers() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "User-Agent".to_string(),
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
    )])
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl ServiceConfig {
    /// Config with default URL, headers and timeouts.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            upload_url: default_upload_url(),
            base_headers: default_base_headers(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
        }
    }

    /// Load and validate the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Config` if the file cannot be read, is not valid
    /// JSON, or lacks a consumer key or secret.
    pub fn load(path: &Path) -> Result<Self, UploadError> {
        let content = fs::read_to_string(path).map_err(|e| {
            UploadError::Config(format!("Unable to read '{}': {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            UploadError::Config(format!("Invalid JSON in '{}': {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), UploadError> {
        if self.consumer_key.trim().is_empty() {
            return Err(UploadError::Config("consumer_key must not be empty".to_string()));
        }
        if self.consumer_secret.is_empty() {
            return Err(UploadError::Config(
                "consumer_secret must not be empty".to_string(),
            ));
        }
        if !self.upload_url.starts_with("http://") && !self.upload_url.starts_with("https://") {
            return Err(UploadError::Config(format!(
                "upload_url '{}' is not an http(s) URL",
                self.upload_url
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
