//! # Scraper Configuration Module
//!
//! This module provides configuration options for the sitemap scraper, including
//! the sitemap location, the origin used to resolve sitemap entries, the block-list
//! and the content extraction rules. It uses a builder pattern for flexible
//! configuration.
//!
//! ## Key Components
//!
//! - `ScrapeConfig`: The main configuration struct with scraper parameters
//! - `ScrapeConfigBuilder`: Builder pattern implementation for easier configuration
//! - `ExtractionConfig`: Element allow-list and the minimum text length gate

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::crawler::error::CrawlError;

/// Sitemap scraped when no other location is configured
pub const DEFAULT_SITEMAP_URL: &str = "https://my.wlu.edu/google-site-map.xml";

/// Origin prepended to every sitemap `loc` value
pub const DEFAULT_BASE_URL: &str = "https://my.wlu.edu/";

/// Pages that are never fetched, regardless of sitemap presence
pub const DEFAULT_BLOCK_LIST: &[&str] =
    &["https://my.wlu.edu/financial-aid/types-of-aid/loans/doe-exit-counseling"];

/// Default location of the failure log
pub const DEFAULT_ERROR_LOG: &str = "raw/error_log.txt";

/// Default minimum length, in characters, of a page's normalized text
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 50;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Elements whose text always contributes to a page's note
const TEXT_ELEMENTS: &str = "p, h1, h2, h3, li";

/// Containers that contribute their full text when enabled
const CONTAINER_ELEMENTS: &str = "article, section";

/// Content extraction rules
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Pages whose normalized text is shorter than this are dropped. Zero disables the gate.
    pub min_text_length: usize,

    /// Whether `article` and `section` containers are extracted alongside text elements
    pub include_containers: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            include_containers: true,
        }
    }
}

impl ExtractionConfig {
    /// CSS selector group matching every element that contributes text
    pub fn selector_group(&self) -> String {
        if self.include_containers {
            format!("{}, {}", TEXT_ELEMENTS, CONTAINER_ELEMENTS)
        } else {
            TEXT_ELEMENTS.to_string()
        }
    }
}

/// Configuration for a scrape run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Location of the sitemap document
    pub sitemap_url: String,

    /// Origin that sitemap `loc` values are appended to
    pub base_url: String,

    /// Fully-qualified URLs that are always skipped
    pub block_list: HashSet<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent to use for requests
    pub user_agent: String,

    /// Append-only file receiving one line per failed page
    pub error_log_path: PathBuf,

    /// Content extraction rules
    pub extraction: ExtractionConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            sitemap_url: DEFAULT_SITEMAP_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            block_list: DEFAULT_BLOCK_LIST.iter().map(|s| s.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("campus-corpus/{}", env!("CARGO_PKG_VERSION")),
            error_log_path: PathBuf::from(DEFAULT_ERROR_LOG),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Builder for ScrapeConfig
#[derive(Debug, Default)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ScrapeConfig::default(),
        }
    }

    /// Set the sitemap location
    pub fn sitemap_url(mut self, sitemap_url: impl Into<String>) -> Self {
        self.config.sitemap_url = sitemap_url.into();
        self
    }

    /// Set the origin used to resolve sitemap entries
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Replace the block-list
    pub fn block_list<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.block_list = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Add a single URL to the block-list
    pub fn block(mut self, url: impl Into<String>) -> Self {
        self.config.block_list.insert(url.into());
        self
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the error log location
    pub fn error_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.error_log_path = path.into();
        self
    }

    /// Set the minimum normalized text length
    pub fn min_text_length(mut self, min_text_length: usize) -> Self {
        self.config.extraction.min_text_length = min_text_length;
        self
    }

    /// Set whether `article` and `section` containers are extracted
    pub fn include_containers(mut self, include_containers: bool) -> Self {
        self.config.extraction.include_containers = include_containers;
        self
    }

    /// Build the configuration, validating both URLs
    pub fn build(self) -> Result<ScrapeConfig, CrawlError> {
        Url::parse(&self.config.sitemap_url)?;
        Url::parse(&self.config.base_url)?;
        if self.config.timeout_secs == 0 {
            return Err(CrawlError::Other("timeout must be at least one second".to_string()));
        }
        Ok(self.config)
    }
}

impl ScrapeConfig {
    /// Create a new builder
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::new()
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScrapeConfig::default();

        assert_eq!(config.sitemap_url, DEFAULT_SITEMAP_URL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.block_list.contains(DEFAULT_BLOCK_LIST[0]));
        assert_eq!(config.extraction.min_text_length, 50);
        assert!(config.extraction.include_containers);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ScrapeConfig::builder()
            .sitemap_url("http://localhost:8080/sitemap.xml")
            .base_url("http://localhost:8080/")
            .block_list(["http://localhost:8080/a"])
            .block("http://localhost:8080/b")
            .min_text_length(0)
            .include_containers(false)
            .error_log_path("/tmp/errors.txt")
            .build()
            .unwrap();

        assert_eq!(config.block_list.len(), 2);
        assert!(!config.block_list.contains(DEFAULT_BLOCK_LIST[0]));
        assert_eq!(config.extraction.min_text_length, 0);
        assert_eq!(config.error_log_path, PathBuf::from("/tmp/errors.txt"));
    }

    #[test]
    fn test_builder_rejects_invalid_urls() {
        let result = ScrapeConfig::builder().base_url("not a url").build();
        assert!(matches!(result, Err(CrawlError::UrlParse(_))));

        let result = ScrapeConfig::builder().sitemap_url("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_selector_group() {
        let mut extraction = ExtractionConfig::default();
        assert_eq!(extraction.selector_group(), "p, h1, h2, h3, li, article, section");

        extraction.include_containers = false;
        assert_eq!(extraction.selector_group(), "p, h1, h2, h3, li");
    }
}
