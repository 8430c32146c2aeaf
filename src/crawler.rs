//! # Sitemap Scraper Module
//!
//! This module turns a website's sitemap into page records. It is the first
//! stage of the corpus workflow, responsible for gathering raw content.
//!
//! ## Key Components
//!
//! - `ScrapeConfig`: Configuration for the scraper, including the sitemap, origin and block-list
//! - `Scraper`: Sequential pipeline from sitemap to accumulated `PageRecord`s
//! - `Fetcher`: Page retrieval through one reusable HTTP client with skip rules
//! - `ErrorLog`: Append-only record of pages that could not be fetched
//! - Content extraction utilities for converting HTML to normalized text
//!
//! ## Failure Handling
//!
//! A sitemap that cannot be fetched or parsed aborts the run. A page that cannot
//! be fetched is written to the error log and skipped. A page whose text is too
//! short is dropped silently.

mod config;
mod content_extraction;
mod error;
mod error_log;
mod fetcher;
mod pipeline;
mod sitemap;

// Re-export important types and functions
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_BLOCK_LIST, DEFAULT_ERROR_LOG, DEFAULT_MIN_TEXT_LENGTH,
    DEFAULT_SITEMAP_URL, ExtractionConfig, ScrapeConfig, ScrapeConfigBuilder,
};
pub use content_extraction::{extract_page, extract_text, normalize_text};
pub use error::CrawlError;
pub use error_log::{ErrorLog, format_entry};
pub use fetcher::{Fetcher, SkipReason};
pub use pipeline::{PageOutcome, ScrapeProgress, ScrapeReport, Scraper};
pub use sitemap::{fetch_sitemap, parse_sitemap, resolve_locations};
