pub mod app;
pub mod args;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod ports;
pub mod upload;
pub mod utils;

pub use args::Args;
pub use errors::UploadError;

use std::sync::Arc;

use app::UploadCore;
use args::Command;
use config::ServiceConfig;
use infra::{ConsoleReporter, GlobMatcher, HttpTransport, JsonCredentialStore, SystemClock};
use tracing::info;
use upload::RequestSigner;

/// Build the production uploader from `args` and run the selected command.
///
/// Per-file failures are reported as they happen and do not make this fail.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the runtime cannot be
/// created, credentials cannot be read, or the concurrency limit is zero.
pub fn run_app(args: &Args) -> Result<(), UploadError> {
    // Nothing is loaded or built for a limit the uploader would refuse anyway.
    if let Command::MultiUpload { parallel, .. } = &args.command {
        app::check_parallel(*parallel)?;
    }

    let config = ServiceConfig::load(&args.config)?;
    let transport = HttpTransport::new(&config)?;
    let core = UploadCore::new(
        Arc::new(JsonCredentialStore::new(&args.token_file)),
        Arc::new(GlobMatcher),
        Arc::new(RequestSigner::new(config, Arc::new(SystemClock))),
        Arc::new(transport),
        Arc::new(ConsoleReporter),
    );

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| UploadError::Runtime(format!("Failed to create runtime: {e}")))?;

    runtime.block_on(async {
        match &args.command {
            Command::Upload { album, file } => {
                // The reporter has already printed any per-file failure.
                match core.upload(album, file).await {
                    Ok(_) => Ok(()),
                    Err(e @ UploadError::CredentialLoad(_)) => Err(e),
                    Err(_) => Ok(()),
                }
            }
            Command::MultiUpload {
                album,
                parallel,
                patterns,
            } => {
                let dispatched = core.multi_upload(*parallel, album, patterns).await?;
                info!(dispatched, album = %album, "multi-upload complete");
                Ok(())
            }
        }
    })
}
