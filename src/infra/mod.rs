pub mod console_reporter;
pub mod credential_store;
pub mod glob_adapter;
pub mod http_transport;
pub mod signing_clock;

pub use console_reporter::ConsoleReporter;
pub use credential_store::JsonCredentialStore;
pub use glob_adapter::GlobMatcher;
pub use http_transport::HttpTransport;
pub use signing_clock::SystemClock;
