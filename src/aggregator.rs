//! Runs every scraper against one browser session and assembles the result.

use crate::clock::Clock;
use crate::config::Config;
use crate::models::ScrapeResult;
use crate::navigator::{Navigator, NavigatorError, NavigatorLauncher};
use crate::scrapers::{facts, hemispheres, image, news};
use crate::tables::TableFetcher;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Failures that prevent a result from being produced at all.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not start a browser session: {0}")]
    Launch(#[source] NavigatorError),
}

/// Scrape every source and return one [`ScrapeResult`].
///
/// Scrapers run sequentially in a fixed order (news, featured image, facts,
/// hemispheres) against a single session, which is closed before returning.
/// Individual scraper failures only leave their fields empty; the only error
/// is failing to start the session.
#[instrument(level = "info", skip_all)]
pub async fn run(
    launcher: &dyn NavigatorLauncher,
    fetcher: &dyn TableFetcher,
    clock: &dyn Clock,
    config: &Config,
) -> Result<ScrapeResult, ScrapeError> {
    let mut nav = launcher.launch().await.map_err(ScrapeError::Launch)?;

    let result = scrape_all(&mut *nav, fetcher, clock, config).await;

    if let Err(e) = nav.close().await {
        error!(error = %e, "Failed to close browser session");
    }

    info!(
        news = result.news_title.is_some(),
        featured_image = result.featured_image.is_some(),
        facts = result.facts.is_some(),
        hemispheres = result.hemispheres.len(),
        "Scrape complete"
    );
    Ok(result)
}

async fn scrape_all(
    nav: &mut dyn Navigator,
    fetcher: &dyn TableFetcher,
    clock: &dyn Clock,
    config: &Config,
) -> ScrapeResult {
    let news = news::extract_news(nav, config).await;
    let featured_image = image::extract_featured_image(nav, config).await;
    let facts = facts::extract_facts(fetcher, config).await;
    let hemispheres = hemispheres::extract_hemispheres(nav, config).await;

    ScrapeResult::new(news, featured_image, facts, hemispheres, clock.now())
}
