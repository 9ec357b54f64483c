//! Logging setup for the application

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log levels selected by the number of `-v` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No verbose flag: warnings and per-file failures only
    Normal = 0,
    /// One verbose flag (-v)
    Info = 1,
    /// Two verbose flags (-v -v)
    Debug = 2,
    /// Three or more
    Trace = 3,
}

impl LogLevel {
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Normal,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    #[must_use]
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Normal => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Install the global tracing subscriber, writing to stderr so stdout stays
/// reserved for upload results. `RUST_LOG`, when set, wins over `verbosity`.
pub fn init_logging(verbosity: u8) {
    let level = LogLevel::from_verbosity(verbosity).filter();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    // A subscriber may already be installed (tests); keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
