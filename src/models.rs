//! Data models for the values pulled off each Mars page and the record they
//! are assembled into.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsItem`]: Latest headline and teaser from the news listing
//! - [`FeaturedImage`]: Absolute URL of the full-resolution featured image
//! - [`FactsTable`]: Mars vs. Earth comparison table, keyed by description
//! - [`Hemisphere`]: Title and full-resolution image URL of one hemisphere
//! - [`ScrapeResult`]: The aggregate record produced by a single run
//!
//! Every value here lives for one run only. Nothing is persisted by this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The newest entry on the news listing page.
///
/// Title and teaser are extracted together; if either is missing the whole
/// item is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// The headline text.
    pub title: String,
    /// The short teaser paragraph shown under the headline.
    pub teaser: String,
}

/// The featured image revealed by the gallery's full-image button.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeaturedImage {
    /// Absolute URL of the full-resolution image.
    pub url: String,
}

/// One row of the Mars vs. Earth comparison table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FactRow {
    /// Row key, e.g. "Equatorial Diameter:".
    pub description: String,
    /// Value of the `Mars` column.
    pub mars: String,
    /// Value of the `Earth` column.
    pub earth: String,
}

/// The Mars vs. Earth comparison table.
///
/// Rows keep the order of the source table. `html` is the display-ready
/// rendering produced when the table was built, with `description` as the
/// index and `Mars`/`Earth` as the columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FactsTable {
    /// Rows in source order, keyed by `description`.
    pub rows: Vec<FactRow>,
    /// HTML rendering of `rows`.
    pub html: String,
}

impl FactsTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// One hemisphere entry from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Hemisphere {
    /// Heading of the hemisphere's detail page.
    pub title: String,
    /// Absolute URL of the full-resolution image.
    pub img_url: String,
}

/// The record produced by one run of the aggregator.
///
/// Every field is independently optional except `hemispheres`, which is always
/// present (but may hold fewer than four entries), and `last_modified`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrapeResult {
    /// Latest news headline.
    pub news_title: Option<String>,
    /// Teaser for the latest news headline.
    pub news_paragraph: Option<String>,
    /// Absolute URL of the featured image.
    pub featured_image: Option<String>,
    /// Mars vs. Earth comparison table.
    pub facts: Option<FactsTable>,
    /// Hemisphere entries in catalog order.
    pub hemispheres: Vec<Hemisphere>,
    /// When the record was assembled.
    pub last_modified: DateTime<Utc>,
}

impl ScrapeResult {
    /// Assemble a result from the individual extractor outputs.
    pub fn new(
        news: Option<NewsItem>,
        featured_image: Option<FeaturedImage>,
        facts: Option<FactsTable>,
        hemispheres: Vec<Hemisphere>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        let (news_title, news_paragraph) = match news {
            Some(item) => (Some(item.title), Some(item.teaser)),
            None => (None, None),
        };
        Self {
            news_title,
            news_paragraph,
            featured_image: featured_image.map(|image| image.url),
            facts,
            hemispheres,
            last_modified,
        }
    }
}
