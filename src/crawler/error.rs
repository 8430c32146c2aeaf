//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} for url: {url}")]
    Status {
        /// Status returned by the server
        status: reqwest::StatusCode,
        /// Requested URL
        url: String,
    },

    /// Sitemap document is not a valid `urlset`
    #[error("Sitemap parsing error: {0}")]
    SitemapParse(#[from] quick_xml::errors::serialize::DeError),

    /// HTML parsing error
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Failure log could not be written
    #[error("Error log write failed: {0}")]
    ErrorLog(#[source] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Http(e) => CrateError::Http(e),
            CrawlError::ErrorLog(e) => CrateError::Io(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}
