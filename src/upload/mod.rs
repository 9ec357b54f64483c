pub mod expand;
pub mod hash;
pub mod sign;

pub use expand::{expand_file_names, expand_patterns};
pub use hash::calculate_md5;
pub use sign::RequestSigner;
