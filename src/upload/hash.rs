use crate::domain::FileDigest;
use crate::errors::UploadError;
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const READ_BUFFER_BYTES: usize = 64 * 1024;

/// Calculate the MD5 sum and exact size of a file in a single streaming pass.
pub fn calculate_md5(path: &Path) -> Result<FileDigest, UploadError> {
    let mut file = File::open(path).map_err(|e| UploadError::file_access(path, e))?;

    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; READ_BUFFER_BYTES];
    let mut size_bytes: u64 = 0;

    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(UploadError::file_access(path, e)),
        };
        hasher.update(&buffer[..n]);
        size_bytes += n as u64;
    }

    Ok(FileDigest {
        md5_hex: hex::encode(hasher.finalize()),
        size_bytes,
    })
}
