//! HTML extraction for page-server documents
//!
//! This module turns a raw page into a `PageDocument`:
//! - The page id (from `div.page-id`)
//! - The current version token (the `<b>` inside `span.node-id`)
//! - Outgoing links (from `a.file-link` and links inside `table.files-table`)
//! - The update history (entries inside `<details>`)

use crate::state::{sort_timestamps, PageDocument, Timestamp};
use chrono::{NaiveDateTime, TimeZone, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use thiserror::Error;

/// Why a document could not be turned into a page record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing 'div.page-id' element")]
    MissingPageId,

    #[error("missing version token in 'span.node-id b'")]
    MissingVersion,

    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Format of a history entry timestamp, e.g. `2025-11-07 16:48:53 UTC`
const HISTORY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Parses a page document into its structured record
///
/// # Example
///
/// ```
/// use freshrank::crawler::parse_page;
///
/// let html = r#"
///     <div class="page-id">Page ID: page_a</div>
///     <span class="node-id">Node ID: <b>n1</b></span>
///     <table class="files-table"><tr><td><a href="/page_b">b</a></td></tr></table>
/// "#;
/// let doc = parse_page(html).unwrap();
/// assert_eq!(doc.page_id, "page_a");
/// assert_eq!(doc.version, "n1");
/// assert_eq!(doc.outgoing, vec!["page_b".to_string()]);
/// ```
pub fn parse_page(html: &str) -> Result<PageDocument, ExtractError> {
    let document = Html::parse_document(html);

    let page_id = extract_page_id(&document)?;
    let version = extract_version(&document)?;
    let outgoing = extract_links(&document)?;
    let update_history = extract_history(&document)?;

    Ok(PageDocument {
        page_id,
        version,
        outgoing,
        update_history,
    })
}

/// Normalizes a link or request path into a page path
///
/// Surrounding whitespace and slashes are removed, so `/page_a/` and
/// `page_a` address the same page. The root `/` becomes the empty path.
pub fn normalize_path(href: &str) -> String {
    href.trim().trim_matches('/').to_string()
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{}: {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn extract_page_id(document: &Html) -> Result<String, ExtractError> {
    let sel = selector("div.page-id")?;
    let text = document
        .select(&sel)
        .next()
        .map(element_text)
        .ok_or(ExtractError::MissingPageId)?;

    // "Page ID: page_gnb58c5k" -> "page_gnb58c5k"
    let id = text.rsplit(':').next().unwrap_or_default().trim().to_string();
    if id.is_empty() {
        return Err(ExtractError::MissingPageId);
    }
    Ok(id)
}

fn extract_version(document: &Html) -> Result<String, ExtractError> {
    let sel = selector("span.node-id b")?;
    document
        .select(&sel)
        .next()
        .map(|b| element_text(b).trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ExtractError::MissingVersion)
}

fn extract_links(document: &Html) -> Result<Vec<String>, ExtractError> {
    let sel = selector("table.files-table a[href], a.file-link[href]")?;
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&sel) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let link = normalize_path(href);
        if !link.is_empty() && seen.insert(link.clone()) {
            links.push(link);
        }
    }

    Ok(links)
}

fn extract_history(document: &Html) -> Result<Vec<Timestamp>, ExtractError> {
    let sel = selector("details div")?;
    let mut history: Vec<Timestamp> = document
        .select(&sel)
        .filter_map(|div| parse_history_entry(&element_text(div)))
        .collect();

    sort_timestamps(&mut history);
    Ok(history)
}

/// Parses one `• <node_id> (YYYY-MM-DD HH:MM:SS UTC)` entry into its timestamp
fn parse_history_entry(text: &str) -> Option<Timestamp> {
    let entry = text.trim().trim_start_matches('•').trim();
    let open = entry.rfind(" (")?;
    let inner = entry[open + 2..].strip_suffix(')')?;

    if entry[..open].trim().is_empty() {
        return None;
    }

    match NaiveDateTime::parse_from_str(inner.trim(), HISTORY_TIME_FORMAT) {
        Ok(naive) => Some(Utc.from_utc_datetime(&naive).timestamp() as Timestamp),
        Err(e) => {
            tracing::debug!("Skipping history entry '{}': {}", entry, e);
            None
        }
    }
}
