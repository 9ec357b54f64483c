use crate::domain::{UploadOutcome, UploadTarget};
use crate::errors::UploadError;
use crate::ports::OutcomeReporter;
use tracing::{info, warn};

/// Prints each upload's status line and response body as it finishes.
pub struct ConsoleReporter;

impl OutcomeReporter for ConsoleReporter {
    fn report(&self, target: &UploadTarget, outcome: &Result<UploadOutcome, UploadError>) {
        match outcome {
            Ok(outcome) => {
                info!(file = %target.path.display(), status = %outcome.status_line, "upload finished");
                println!("{}: {}", target.path.display(), outcome.status_line);
                println!("{}", outcome.body);
            }
            Err(e) => {
                warn!(file = %target.path.display(), error = %e, "upload failed");
                eprintln!("Error uploading {}: {e}", target.path.display());
            }
        }
    }
}
