//! # Mars Scrape
//!
//! Collects the latest Mars news, the featured image, the Mars vs. Earth
//! fact table and the four hemisphere images into a single JSON record.
//!
//! ## Usage
//!
//! ```sh
//! mars_scrape -o ./data
//! ```
//!
//! ## Architecture
//!
//! 1. **Session**: Launch one headless Chromium page
//! 2. **Scraping**: Run the news, image, facts and hemisphere scrapers in turn
//! 3. **Assembly**: Stamp the combined record and close the session
//! 4. **Output**: Write the record as JSON (or print it)

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod clock;
mod config;
mod document;
mod models;
mod navigator;
mod outputs;
mod scrapers;
mod tables;
mod utils;

use clock::SystemClock;
use cli::Cli;
use config::Config;
use navigator::chromium::ChromiumLauncher;
use outputs::json;
use tables::HttpTableFetcher;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("mars_scrape starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, headed = args.headed, "Parsed CLI arguments");

    let config = match args.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Early check so a bad output dir fails before the browser starts
    if let Some(ref dir) = args.output_dir {
        if let Err(e) = utils::ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    let launcher = ChromiumLauncher::new(
        args.chrome_path.clone(),
        !args.headed,
        config.navigation_timeout(),
    );
    let fetcher = HttpTableFetcher::new(config.navigation_timeout())?;

    let result = aggregator::run(&launcher, &fetcher, &SystemClock, &config).await?;

    match args.output_dir {
        Some(ref dir) => {
            json::write_result(&result, dir).await?;
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
