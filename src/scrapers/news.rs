//! Latest headline from the Red Planet Science news listing.
//!
//! The listing renders each story as a `div.list_text` block holding a
//! `div.content_title` and a `div.article_teaser_body`. Only the first block
//! is read.

use crate::config::Config;
use crate::document;
use crate::models::NewsItem;
use crate::navigator::{Navigator, NavigatorError};
use crate::utils::truncate_for_log;
use tracing::{debug, error, info, instrument, warn};

const SLIDE_SELECTOR: &str = "div.list_text";

/// Scrape the newest news item, or `None` if the page can't be read or its
/// layout doesn't match.
#[instrument(level = "info", skip_all, fields(url = %config.news_url))]
pub async fn extract_news(nav: &mut dyn Navigator, config: &Config) -> Option<NewsItem> {
    let html = match load_listing(nav, config).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "News page failed to load");
            return None;
        }
    };

    match parse_news(&html) {
        Some(item) => {
            info!(title = %item.title, "Scraped latest news");
            Some(item)
        }
        None => {
            warn!("News listing layout did not match");
            debug!(html = %truncate_for_log(&html, 200), "Unmatched news listing");
            None
        }
    }
}

async fn load_listing(nav: &mut dyn Navigator, config: &Config) -> Result<String, NavigatorError> {
    nav.navigate(&config.news_url).await?;
    nav.wait_until_present(SLIDE_SELECTOR, config.wait_timeout()).await;
    nav.current_html().await
}

/// Pull the first story's title and teaser out of the listing HTML.
pub fn parse_news(html: &str) -> Option<NewsItem> {
    let doc = document::parse(html);
    let slide = document::select_first(&doc, SLIDE_SELECTOR)?;
    let title = document::find(slide, "div", "content_title")?;
    let teaser = document::find(slide, "div", "article_teaser_body")?;
    Some(NewsItem {
        title: document::text(title),
        teaser: document::text(teaser),
    })
}
