//! JSON output for scrape results.
//!
//! # Output Structure
//!
//! One file per day; a later run on the same day replaces the earlier one:
//! ```text
//! output_dir/
//! ├── mars_2025-05-06.json
//! └── mars_2025-05-07.json
//! ```

use crate::models::ScrapeResult;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Path of the file a result is written to.
pub fn output_path(result: &ScrapeResult, output_dir: &str) -> PathBuf {
    let date = result.last_modified.date_naive();
    PathBuf::from(output_dir).join(format!("mars_{date}.json"))
}

/// Write `result` as pretty-printed JSON under `output_dir`.
///
/// # Returns
///
/// The path written to.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_result(result: &ScrapeResult, output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    ensure_writable_dir(output_dir).await?;
    let json = serde_json::to_string_pretty(result)?;
    let path = output_path(result, output_dir);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote scrape result");
    Ok(path)
}
