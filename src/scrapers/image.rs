//! Featured image from the Space Images gallery.
//!
//! The full-resolution image only appears after the gallery's "full image"
//! button opens a lightbox, so this scraper needs the interactive session.

use crate::config::Config;
use crate::document;
use crate::models::FeaturedImage;
use crate::navigator::{Navigator, NavigatorError};
use crate::utils::absolute_url;
use tracing::{error, info, instrument, warn};

/// Position of the full-image control among the page's `<button>` elements.
pub const FULL_IMAGE_BUTTON_INDEX: usize = 1;

const BUTTON_SELECTOR: &str = "button";
const FULL_IMAGE_SELECTOR: &str = "img.fancybox-image";

/// Open the lightbox and return the absolute URL of the image inside it.
#[instrument(level = "info", skip_all, fields(url = %config.image_url))]
pub async fn extract_featured_image(
    nav: &mut dyn Navigator,
    config: &Config,
) -> Option<FeaturedImage> {
    let html = match open_full_image(nav, config).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Could not open the full image");
            return None;
        }
    };

    match parse_full_image_src(&html) {
        Some(src) => {
            let url = absolute_url(&config.image_url, &src);
            info!(%url, "Scraped featured image");
            Some(FeaturedImage { url })
        }
        None => {
            warn!("Full image element not found after click");
            None
        }
    }
}

async fn open_full_image(nav: &mut dyn Navigator, config: &Config) -> Result<String, NavigatorError> {
    nav.navigate(&config.image_url).await?;
    let buttons = nav.find_all(BUTTON_SELECTOR).await?;
    let button = buttons
        .get(FULL_IMAGE_BUTTON_INDEX)
        .ok_or_else(|| NavigatorError::ElementNotFound {
            selector: BUTTON_SELECTOR.to_string(),
            index: FULL_IMAGE_BUTTON_INDEX,
        })?;
    nav.click(button).await?;
    nav.wait_until_present(FULL_IMAGE_SELECTOR, config.wait_timeout()).await;
    nav.current_html().await
}

/// Relative `src` of the lightbox image.
pub fn parse_full_image_src(html: &str) -> Option<String> {
    let doc = document::parse(html);
    let img = document::find(doc.root_element(), "img", "fancybox-image")?;
    document::attr(img, "src").map(str::to_string)
}
