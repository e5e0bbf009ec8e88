//! Command-line interface definitions for Mars Scrape.
//!
//! All arguments can be provided via command-line flags or environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Mars Scrape application.
///
/// # Examples
///
/// ```sh
/// # Print the result as JSON
/// mars_scrape
///
/// # Write to a directory, watching the browser work
/// mars_scrape -o ./data --headed
///
/// # Override page URLs and timeouts
/// mars_scrape -c ./mars.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory for the JSON result; prints to stdout when omitted
    #[arg(short, long, env = "MARS_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "MARS_CONFIG")]
    pub config: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Path to a Chrome/Chromium executable
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
}
