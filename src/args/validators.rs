use super::types::{Args, Command};

/// Validate the args for the selected command
///
/// `--parallel 0` is deliberately let through: the uploader rejects it itself.
///
/// # Errors
///
/// Returns an error if the album key is blank or looks like a URI, or if a
/// pattern is empty.
pub fn validate(args: &Args) -> Result<(), String> {
    let album = args.command.album();
    if album.trim().is_empty() {
        return Err("--album must not be empty".to_string());
    }
    if album.contains('/') {
        return Err(format!("--album '{album}' should be the album key, not a URI"));
    }

    if let Command::MultiUpload { patterns, .. } = &args.command {
        if patterns.iter().any(|p| p.trim().is_empty()) {
            return Err("empty file pattern given".to_string());
        }
    }
    Ok(())
}
