//! Page fetching for the crawler module

use std::collections::HashSet;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::crawler::config::ScrapeConfig;
use crate::crawler::error::CrawlError;

/// Reason a candidate URL was not fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL points at another sitemap document
    SitemapDocument,

    /// The URL is on the block-list
    Blocked,
}

/// Fetches pages through one reusable HTTP client
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    block_list: HashSet<String>,
}

impl Fetcher {
    /// Create a fetcher from the scrape configuration
    pub fn new(config: &ScrapeConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            block_list: config.block_list.clone(),
        })
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Why a URL should not be fetched, if it should be skipped at all
    pub fn skip_reason(&self, url: &str) -> Option<SkipReason> {
        if url.ends_with(".xml") {
            Some(SkipReason::SitemapDocument)
        } else if self.block_list.contains(url) {
            Some(SkipReason::Blocked)
        } else {
            None
        }
    }

    /// Fetch a page and return its body
    ///
    /// Transport errors and non-success statuses are returned as errors.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
