//! Mars vs. Earth comparison table from Galaxy Facts.
//!
//! The table has three columns with no usable header. Columns are assigned
//! by position (`description`, `Mars`, `Earth`) and rows are keyed by the
//! description.

use crate::config::Config;
use crate::models::{FactRow, FactsTable};
use crate::tables::{RawTable, TableError, TableFetcher};
use std::fmt::Write;
use tracing::{error, info, instrument};

/// Column names, in source order.
pub const COLUMNS: [&str; 3] = ["description", "Mars", "Earth"];

/// Fetch and shape the comparison table. Any failure yields `None`.
#[instrument(level = "info", skip_all, fields(url = %config.facts_url))]
pub async fn extract_facts(fetcher: &dyn TableFetcher, config: &Config) -> Option<FactsTable> {
    let result = fetcher
        .fetch_first_table(&config.facts_url)
        .await
        .and_then(build_facts_table);

    match result {
        Ok(table) => {
            info!(rows = table.len(), "Scraped facts table");
            Some(table)
        }
        Err(e) => {
            error!(error = %e, "Facts table unavailable");
            None
        }
    }
}

/// Assign positional columns to a raw table and render it.
pub fn build_facts_table(raw: RawTable) -> Result<FactsTable, TableError> {
    if let Some(ref header) = raw.header {
        if header.len() != COLUMNS.len() {
            return Err(TableError::Shape(format!(
                "header has {} columns, expected {}",
                header.len(),
                COLUMNS.len()
            )));
        }
    }
    if raw.rows.is_empty() {
        return Err(TableError::Shape("table has no data rows".to_string()));
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (i, cells) in raw.rows.into_iter().enumerate() {
        let [description, mars, earth]: [String; 3] = cells.try_into().map_err(|cells: Vec<String>| {
            TableError::Shape(format!("row {i} has {} cells, expected {}", cells.len(), COLUMNS.len()))
        })?;
        rows.push(FactRow {
            description,
            mars,
            earth,
        });
    }

    let html = render_html(&rows);
    Ok(FactsTable { rows, html })
}

/// Render rows as an HTML table indexed by description.
pub fn render_html(rows: &[FactRow]) -> String {
    let mut html = String::new();
    html.push_str("<table border=\"1\" class=\"dataframe\">\n");
    html.push_str("  <thead>\n");
    html.push_str("    <tr style=\"text-align: right;\">\n      <th></th>\n");
    for column in &COLUMNS[1..] {
        let _ = writeln!(html, "      <th>{column}</th>");
    }
    html.push_str("    </tr>\n");
    let _ = writeln!(
        html,
        "    <tr>\n      <th>{}</th>\n      <th></th>\n      <th></th>\n    </tr>",
        COLUMNS[0]
    );
    html.push_str("  </thead>\n");
    html.push_str("  <tbody>\n");
    for row in rows {
        let _ = writeln!(
            html,
            "    <tr>\n      <th>{}</th>\n      <td>{}</td>\n      <td>{}</td>\n    </tr>",
            escape(&row.description),
            escape(&row.mars),
            escape(&row.earth)
        );
    }
    html.push_str("  </tbody>\n");
    html.push_str("</table>");
    html
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
