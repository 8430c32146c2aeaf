//! # campus-corpus - Website Corpus Builder for Rust
//!
//! This crate builds a text corpus from a website's sitemap, provides
//! exploratory analysis over the corpus, and exposes a streaming chat front end
//! on top of a text-generation model.
//!
//! ## Features
//!
//! - Sitemap-driven scraping with a per-URL error log
//! - HTML text extraction with whitespace and case normalization
//! - Newline-delimited JSON corpus storage
//! - Sentence segmentation and word-count analysis
//! - Length and keyword filtering with re-export
//! - Chat prompt assembly with token-by-token streaming over a bounded channel
//!
//! ## Example
//!
//! ```rust,no_run
//! use campus_corpus::crawler::{ScrapeConfig, Scraper};
//! use campus_corpus::corpus::write_corpus;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScrapeConfig::builder()
//!         .sitemap_url("https://my.wlu.edu/google-site-map.xml")
//!         .base_url("https://my.wlu.edu/")
//!         .build()?;
//!
//!     let scraper = Scraper::new(config)?;
//!     let report = scraper.run(None).await?;
//!     write_corpus("raw/notes.jsonl", &report.records).await?;
//!
//!     println!("Scraped {} pages", report.records.len());
//!     Ok(())
//! }
//! ```

mod error;

pub mod analysis;
pub mod chat;
pub mod corpus;
pub mod crawler;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
