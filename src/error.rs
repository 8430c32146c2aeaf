//! Error types for the campus-corpus crate

use thiserror::Error;

/// Result type for campus-corpus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for campus-corpus operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Web scraping error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Corpus loading or writing error
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Chat generation error
    #[error("Chat error: {0}")]
    Chat(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
