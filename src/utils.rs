//! Utility functions for URL assembly, log formatting, and file system checks.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Join a site base URL and a relative path scraped from that site.
///
/// This is plain string concatenation with a `/` separator, matching how the
/// sites publish their relative links. No normalization is applied, so a
/// path that already starts with `/` produces `//`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(absolute_url("https://a.test", "img/x.jpg"), "https://a.test/img/x.jpg");
/// assert_eq!(absolute_url("https://a.test", "/img/x.jpg"), "https://a.test//img/x.jpg");
/// ```
pub fn absolute_url(base: &str, relative: &str) -> String {
    format!("{base}/{relative}")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a char boundary)
/// with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
