use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::domain::{Credentials, FileDigest, UploadOutcome, UploadTarget};
use crate::errors::UploadError;
use crate::ports::{CredentialStore, OutcomeReporter, PatternMatcher, UploadTransport};
use crate::upload::{RequestSigner, calculate_md5, expand_file_names};

/// Drives single and bounded-parallel uploads through the injected ports.
pub struct UploadCore {
    credentials: Arc<dyn CredentialStore>,
    matcher: Arc<dyn PatternMatcher>,
    signer: Arc<RequestSigner>,
    transport: Arc<dyn UploadTransport>,
    reporter: Arc<dyn OutcomeReporter>,
}

impl UploadCore {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        matcher: Arc<dyn PatternMatcher>,
        signer: Arc<RequestSigner>,
        transport: Arc<dyn UploadTransport>,
        reporter: Arc<dyn OutcomeReporter>,
    ) -> Self {
        Self {
            credentials,
            matcher,
            signer,
            transport,
            reporter,
        }
    }

    /// Upload a single file to the album identified by `album_key`.
    ///
    /// The outcome is handed to the reporter and also returned.
    ///
    /// # Errors
    /// Returns an error if credentials cannot be loaded (nothing is reported
    /// in that case), or the per-file hashing, signing or transport error.
    pub async fn upload(
        &self,
        album_key: &str,
        path: &Path,
    ) -> Result<UploadOutcome, UploadError> {
        let credentials = self.credentials.load()?;
        let target = UploadTarget::new(album_key, path);

        let outcome =
            upload_one(&self.signer, self.transport.as_ref(), &credentials, &target).await;
        self.reporter.report(&target, &outcome);
        outcome
    }

    /// Upload every file matched by `patterns`, at most `parallel` at a time.
    ///
    /// Each file is an independent unit: its outcome goes to the reporter and
    /// a failure never stops the other files. Returns once every dispatched
    /// unit has finished, with the number of units dispatched.
    ///
    /// # Errors
    /// Returns `InvalidConcurrency` for `parallel == 0` before touching
    /// credentials, the filesystem or the network, and `CredentialLoad` if
    /// the token cannot be read. Per-file failures are never returned here.
    pub async fn multi_upload<S: AsRef<str>>(
        &self,
        parallel: usize,
        album_key: &str,
        patterns: &[S],
    ) -> Result<usize, UploadError> {
        check_parallel(parallel)?;

        let credentials = Arc::new(self.credentials.load()?);
        let files = expand_file_names(patterns, self.matcher.as_ref());
        info!(count = files.len(), files = ?files, "expanded file list");

        let slots = Arc::new(Semaphore::new(parallel));
        let mut units = JoinSet::new();
        let mut dispatched = 0usize;

        for path in files {
            // Wait for a free slot before starting the next unit.
            let permit = match Arc::clone(&slots).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(error = %e, "upload slots closed, not dispatching remaining files");
                    break;
                }
            };

            let target = UploadTarget::new(album_key, path);
            let signer = Arc::clone(&self.signer);
            let transport = Arc::clone(&self.transport);
            let reporter = Arc::clone(&self.reporter);
            let credentials = Arc::clone(&credentials);

            units.spawn(async move {
                let _permit = permit;
                debug!(file = %target.path.display(), "upload started");
                let outcome =
                    upload_one(&signer, transport.as_ref(), &credentials, &target).await;
                reporter.report(&target, &outcome);
            });
            dispatched += 1;
        }

        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "upload unit did not complete");
            }
        }

        info!(dispatched, "all uploads finished");
        Ok(dispatched)
    }
}

/// Reject a concurrency limit below 1.
///
/// # Errors
/// Returns `InvalidConcurrency` when `parallel` is zero.
pub fn check_parallel(parallel: usize) -> Result<(), UploadError> {
    if parallel < 1 {
        return Err(UploadError::InvalidConcurrency(parallel));
    }
    Ok(())
}

/// Hash, sign and send one file.
async fn upload_one(
    signer: &RequestSigner,
    transport: &dyn UploadTransport,
    credentials: &Credentials,
    target: &UploadTarget,
) -> Result<UploadOutcome, UploadError> {
    let digest = hash_off_runtime(target.path.clone()).await?;
    let request = signer.sign(credentials, target, &digest)?;
    transport.send(request).await
}

async fn hash_off_runtime(path: PathBuf) -> Result<FileDigest, UploadError> {
    tokio::task::spawn_blocking(move || calculate_md5(&path))
        .await
        .map_err(|e| UploadError::Runtime(format!("hashing task failed: {e}")))?
}
