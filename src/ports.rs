use crate::domain::{Credentials, SignedRequest, UploadOutcome, UploadTarget};
use crate::errors::UploadError;
use async_trait::async_trait;
use mockall::automock;
use std::path::PathBuf;

/// Turns one path or glob pattern into the concrete files it names.
#[automock]
pub trait PatternMatcher: Send + Sync {
    fn matches(&self, pattern: &str) -> Result<Vec<PathBuf>, UploadError>;
}

/// Source of the per-request OAuth timestamp and nonce.
#[automock]
pub trait SigningClock: Send + Sync {
    fn timestamp(&self) -> i64;
    fn nonce(&self) -> String;
}

#[automock]
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Credentials, UploadError>;
}

/// Executes one signed upload. Implementations are shared by every
/// concurrent unit of work, so they must tolerate parallel calls.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(&self, request: SignedRequest) -> Result<UploadOutcome, UploadError>;
}

#[automock]
pub trait OutcomeReporter: Send + Sync {
    fn report(&self, target: &UploadTarget, outcome: &Result<UploadOutcome, UploadError>);
}
