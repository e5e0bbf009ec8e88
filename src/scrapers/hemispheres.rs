//! Full-resolution hemisphere images from the Mars Hemispheres catalog.
//!
//! The catalog renders every entry twice: once as a thumbnail link and once
//! as a titled link, both matching `a.product-item`. Only the second anchor
//! of each pair is used, so entry `i` lives at position
//! `REAL_LINK_OFFSET + i * REAL_LINK_STRIDE` in the anchor list.
//!
//! Each entry is a round trip on the shared session: click into the detail
//! page, read the image link and title, then go back to the catalog. Anchor
//! handles are re-queried every time because the catalog is reloaded after
//! each visit.

use crate::config::Config;
use crate::document;
use crate::models::Hemisphere;
use crate::navigator::{Navigator, NavigatorError};
use crate::utils::{absolute_url, truncate_for_log};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Anchors on the catalog page, thumbnails and titles interleaved.
pub const HEMISPHERE_LINK_SELECTOR: &str = "a.product-item";
/// Heading that marks a loaded detail page.
const DETAIL_TITLE_SELECTOR: &str = "h2.title";
/// Number of catalog entries scraped per run.
pub const HEMISPHERE_COUNT: usize = 4;
/// Index of the first titled anchor in the anchor list.
pub const REAL_LINK_OFFSET: usize = 1;
/// Anchors rendered per catalog entry.
pub const REAL_LINK_STRIDE: usize = 2;

/// Links whose destination is an image file.
static FULL_RES_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif|tiff?)$").unwrap());

#[derive(Debug, Error)]
enum EntryError {
    #[error(transparent)]
    Navigator(#[from] NavigatorError),

    #[error("no full-resolution image link on detail page")]
    MissingImageLink,

    #[error("no title on detail page")]
    MissingTitle,
}

/// Position of catalog entry `entry` in the `a.product-item` list.
pub const fn catalog_position(entry: usize) -> usize {
    REAL_LINK_OFFSET + entry * REAL_LINK_STRIDE
}

/// Visit each catalog entry in order and collect its title and image URL.
///
/// A broken entry is logged and skipped; the rest of the catalog is still
/// scraped. The result holds at most [`HEMISPHERE_COUNT`] entries in catalog
/// order.
#[instrument(level = "info", skip_all, fields(url = %config.hemispheres_url))]
pub async fn extract_hemispheres(nav: &mut dyn Navigator, config: &Config) -> Vec<Hemisphere> {
    let mut hemispheres = Vec::with_capacity(HEMISPHERE_COUNT);

    if let Err(e) = open_catalog(nav, config).await {
        error!(error = %e, "Hemisphere catalog failed to load");
        return hemispheres;
    }

    for entry in 0..HEMISPHERE_COUNT {
        let position = catalog_position(entry);
        match scrape_entry(nav, config, position).await {
            Ok(hemisphere) => {
                debug!(entry, title = %hemisphere.title, "Scraped hemisphere");
                hemispheres.push(hemisphere);
                if let Err(e) = nav.go_back().await {
                    warn!(entry, error = %e, "History back failed; reloading catalog");
                    if let Err(e) = open_catalog(nav, config).await {
                        error!(error = %e, "Could not return to catalog; stopping");
                        break;
                    }
                }
            }
            Err(e) => {
                warn!(entry, position, error = %e, "Skipping hemisphere entry");
                if let Err(e) = restore_catalog(nav, config).await {
                    error!(error = %e, "Could not return to catalog; stopping");
                    break;
                }
            }
        }
    }

    info!(count = hemispheres.len(), "Scraped hemispheres");
    hemispheres
}

async fn open_catalog(nav: &mut dyn Navigator, config: &Config) -> Result<(), NavigatorError> {
    nav.navigate(&config.hemispheres_url).await?;
    nav.wait_until_present(HEMISPHERE_LINK_SELECTOR, config.wait_timeout())
        .await;
    Ok(())
}

/// After a failed entry the session may be on the catalog or on a detail
/// page; reload the catalog only if its anchors are gone.
async fn restore_catalog(nav: &mut dyn Navigator, config: &Config) -> Result<(), NavigatorError> {
    if nav.find_all(HEMISPHERE_LINK_SELECTOR).await?.is_empty() {
        open_catalog(nav, config).await?;
    }
    Ok(())
}

async fn scrape_entry(
    nav: &mut dyn Navigator,
    config: &Config,
    position: usize,
) -> Result<Hemisphere, EntryError> {
    let anchors = nav.find_all(HEMISPHERE_LINK_SELECTOR).await?;
    let anchor = anchors
        .get(position)
        .ok_or_else(|| NavigatorError::ElementNotFound {
            selector: HEMISPHERE_LINK_SELECTOR.to_string(),
            index: position,
        })?;
    nav.click(anchor).await?;
    // A click can return before the detail page has replaced the catalog.
    nav.wait_until_present(DETAIL_TITLE_SELECTOR, config.wait_timeout())
        .await;
    let html = nav.current_html().await?;
    parse_detail(&html, &config.hemispheres_url).inspect_err(|_| {
        debug!(html = %truncate_for_log(&html, 200), "Detail page did not match");
    })
}

fn parse_detail(html: &str, base: &str) -> Result<Hemisphere, EntryError> {
    let doc = document::parse(html);
    let root = doc.root_element();

    let href = document::find_by_attr_regex(root, "href", &FULL_RES_HREF)
        .and_then(|link| document::attr(link, "href"))
        .ok_or(EntryError::MissingImageLink)?;
    let title = document::select_first(&doc, DETAIL_TITLE_SELECTOR)
        .map(document::text)
        .ok_or(EntryError::MissingTitle)?;

    Ok(Hemisphere {
        title,
        img_url: absolute_url(base, href),
    })
}
