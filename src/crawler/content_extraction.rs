//! Content extraction functionality for the crawler module

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::corpus::PageRecord;
use crate::crawler::config::ExtractionConfig;
use crate::crawler::error::CrawlError;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Collapse whitespace runs to a single space, lower-case and trim
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(text, " ")
        .trim()
        .to_lowercase()
}

/// Extract the normalized text of a page
///
/// # Arguments
///
/// * `html` - The HTML of the page
/// * `config` - Element allow-list
///
/// # Returns
///
/// The trimmed text of every matched element, in document order, joined with
/// single spaces and normalized
pub fn extract_text(html: &str, config: &ExtractionConfig) -> Result<String, CrawlError> {
    let document = Html::parse_document(html);

    let group = config.selector_group();
    let selector = Selector::parse(&group)
        .map_err(|e| CrawlError::HtmlParse(format!("Failed to parse selector '{}': {}", group, e)))?;

    let pieces: Vec<String> = document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect();

    Ok(normalize_text(&pieces.join(" ")))
}

/// Build a page record, or `None` when the page fails the quality gate
///
/// # Arguments
///
/// * `url` - The URL of the page
/// * `html` - The HTML of the page
/// * `config` - Extraction rules, including the minimum text length
pub fn extract_page(
    url: &str,
    html: &str,
    config: &ExtractionConfig,
) -> Result<Option<PageRecord>, CrawlError> {
    let note = extract_text(html, config)?;

    let length = note.chars().count();
    if note.is_empty() || length < config.min_text_length {
        debug!("Dropping {}: {} characters of text", url, length);
        return Ok(None);
    }

    Ok(Some(PageRecord {
        url: url.to_string(),
        note,
    }))
}
