//! Fetching and parsing the first HTML table on a page.
//!
//! The facts page is plain server-rendered markup, so it is fetched with
//! `reqwest` rather than through the browser session.

use crate::document;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());

/// Errors raised while fetching or parsing a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no table found at {0}")]
    NoTable(String),

    #[error("table shape mismatch: {0}")]
    Shape(String),
}

/// Cell text of a table, split into an optional header row and data rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

/// Source of the first table on a page.
#[async_trait]
pub trait TableFetcher: Send + Sync {
    async fn fetch_first_table(&self, url: &str) -> Result<RawTable, TableError>;
}

/// Fetches pages over HTTP and parses their first table.
pub struct HttpTableFetcher {
    client: Client,
}

impl HttpTableFetcher {
    pub fn new(timeout: Duration) -> Result<Self, TableError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TableFetcher for HttpTableFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_first_table(&self, url: &str) -> Result<RawTable, TableError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(bytes = body.len(), "Fetched table page");

        let table = parse_first_table(&body).map_err(|e| match e {
            TableError::NoTable(_) => TableError::NoTable(url.to_string()),
            other => other,
        })?;
        info!(rows = table.rows.len(), "Parsed first table");
        Ok(table)
    }
}

/// Parse the first `<table>` in `html`.
///
/// Rows inside `<thead>`, or a leading row made only of `<th>` cells, become
/// the header. Every other row with at least one cell is data.
pub fn parse_first_table(html: &str) -> Result<RawTable, TableError> {
    let doc = document::parse(html);
    let table = doc
        .select(&TABLE)
        .next()
        .ok_or_else(|| TableError::NoTable("document".to_string()))?;

    let mut raw = RawTable::default();
    for (i, row) in table.select(&ROW).enumerate() {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
        if cells.is_empty() {
            continue;
        }
        let texts: Vec<String> = cells.iter().map(|c| document::text(*c)).collect();

        let in_thead = row
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|p| p.value().name() == "thead");
        let all_th = cells.iter().all(|c| c.value().name() == "th");

        if raw.header.is_none() && raw.rows.is_empty() && (in_thead || (i == 0 && all_th)) {
            raw.header = Some(texts);
        } else {
            raw.rows.push(texts);
        }
    }
    Ok(raw)
}
