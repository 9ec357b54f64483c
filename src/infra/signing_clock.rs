use crate::ports::SigningClock;
use rand::Rng;
use rand::distributions::Alphanumeric;

const NONCE_LEN: usize = 32;

/// Wall-clock timestamp and a random alphanumeric nonce per request.
pub struct SystemClock;

impl SigningClock for SystemClock {
    fn timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn nonce(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect()
    }
}
