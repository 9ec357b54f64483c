use crate::domain::Credentials;
use crate::errors::UploadError;
use crate::ports::CredentialStore;
use std::fs;
use std::path::PathBuf;

/// Reads the OAuth access token from a JSON file of the form
/// `{"token": "...", "secret": "..."}`.
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<Credentials, UploadError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            UploadError::CredentialLoad(format!("{}: {e}", self.path.display()))
        })?;
        let credentials: Credentials = serde_json::from_str(&content).map_err(|e| {
            UploadError::CredentialLoad(format!("{}: {e}", self.path.display()))
        })?;

        if credentials.token.is_empty() || credentials.secret.is_empty() {
            return Err(UploadError::CredentialLoad(format!(
                "{}: token and secret must both be set",
                self.path.display()
            )));
        }
        Ok(credentials)
    }
}
