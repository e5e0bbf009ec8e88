//! Output writers for scrape results.
//!
//! # Submodules
//!
//! - [`json`]: Writes a `ScrapeResult` to a dated JSON file

pub mod json;
