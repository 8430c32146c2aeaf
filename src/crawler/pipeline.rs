//! Sequential scrape pipeline: sitemap, fetch, extract, accumulate

use tokio::sync::mpsc;
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

use crate::corpus::PageRecord;
use crate::crawler::config::ScrapeConfig;
use crate::crawler::content_extraction::extract_page;
use crate::crawler::error::CrawlError;
use crate::crawler::error_log::ErrorLog;
use crate::crawler::fetcher::{Fetcher, SkipReason};
use crate::crawler::sitemap::fetch_sitemap;

/// What happened to a single candidate URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// A record was added to the corpus
    Extracted,

    /// The page was fetched but its text failed the quality gate
    Rejected,

    /// The URL was never fetched
    Skipped(SkipReason),

    /// Fetching failed and the failure was logged
    Failed(String),
}

/// Progress notifications emitted while scraping
#[derive(Debug, Clone)]
pub enum ScrapeProgress {
    /// The sitemap was read; `total` candidate URLs follow
    Started {
        /// Number of candidate URLs
        total: usize,
    },

    /// One candidate URL was handled
    Processed {
        /// The candidate URL
        url: String,
        /// What happened to it
        outcome: PageOutcome,
    },
}

/// Result of a scrape run
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Extracted records, in sitemap order
    pub records: Vec<PageRecord>,

    /// Number of candidate URLs read from the sitemap
    pub candidates: usize,

    /// URLs skipped by suffix or block-list
    pub skipped: usize,

    /// URLs whose fetch failed
    pub failed: usize,

    /// Pages dropped by the quality gate
    pub rejected: usize,
}

impl ScrapeReport {
    fn tally(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Extracted => {}
            PageOutcome::Rejected => self.rejected += 1,
            PageOutcome::Skipped(_) => self.skipped += 1,
            PageOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Scrapes every page listed in a sitemap, one page at a time
#[derive(Debug)]
pub struct Scraper {
    config: ScrapeConfig,
    fetcher: Fetcher,
    error_log: ErrorLog,
}

impl Scraper {
    /// Create a scraper from its configuration
    pub fn new(config: ScrapeConfig) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(&config)?;
        let error_log = ErrorLog::new(config.error_log_path.clone());
        Ok(Self {
            config,
            fetcher,
            error_log,
        })
    }

    /// The configuration this scraper runs with
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Read the sitemap and scrape every candidate URL
    ///
    /// # Arguments
    ///
    /// * `progress` - Optional channel receiving progress notifications
    ///
    /// # Returns
    ///
    /// The accumulated records and counters. Only a sitemap failure aborts
    /// the run; failed pages are logged and counted.
    #[instrument(skip(self, progress), fields(sitemap = %self.config.sitemap_url))]
    pub async fn run(
        &self,
        progress: Option<mpsc::Sender<ScrapeProgress>>,
    ) -> Result<ScrapeReport, CrawlError> {
        let urls = fetch_sitemap(
            self.fetcher.client(),
            &self.config.sitemap_url,
            &self.config.base_url,
        )
        .await?;
        info!("Sitemap listed {} candidate URLs", urls.len());

        Ok(self.scrape_urls(&urls, progress).await)
    }

    /// Scrape an explicit list of candidate URLs
    pub async fn scrape_urls(
        &self,
        urls: &[String],
        progress: Option<mpsc::Sender<ScrapeProgress>>,
    ) -> ScrapeReport {
        if let Err(e) = self.error_log.prepare().await {
            error!(path = %self.error_log.path().display(), "Error log unavailable: {}", e);
        }

        let mut report = ScrapeReport {
            candidates: urls.len(),
            ..Default::default()
        };
        notify(&progress, ScrapeProgress::Started { total: urls.len() }).await;

        for url in urls {
            let outcome = self
                .process(url, &mut report.records)
                .instrument(info_span!("process_page", url = %url))
                .await;
            report.tally(&outcome);
            notify(
                &progress,
                ScrapeProgress::Processed {
                    url: url.clone(),
                    outcome,
                },
            )
            .await;
        }

        info!(
            records = report.records.len(),
            skipped = report.skipped,
            failed = report.failed,
            rejected = report.rejected,
            "Scrape finished"
        );
        report
    }

    async fn process(&self, url: &str, records: &mut Vec<PageRecord>) -> PageOutcome {
        if let Some(reason) = self.fetcher.skip_reason(url) {
            debug!("Skipping {}: {:?}", url, reason);
            return PageOutcome::Skipped(reason);
        }

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => return self.fail(url, e).await,
        };

        match extract_page(url, &html, &self.config.extraction) {
            Ok(Some(record)) => {
                records.push(record);
                PageOutcome::Extracted
            }
            Ok(None) => PageOutcome::Rejected,
            Err(e) => self.fail(url, e).await,
        }
    }

    // An unwritable error log is reported but never stops the run
    async fn fail(&self, url: &str, e: CrawlError) -> PageOutcome {
        warn!("Failed to process {}: {}", url, e);
        if let Err(log_err) = self.error_log.record(url, &e).await {
            error!(
                path = %self.error_log.path().display(),
                "Could not record failure of {}: {}", url, log_err
            );
        }
        PageOutcome::Failed(e.to_string())
    }
}

async fn notify(progress: &Option<mpsc::Sender<ScrapeProgress>>, event: ScrapeProgress) {
    if let Some(sender) = progress {
        // A dropped receiver only means nobody is watching
        let _ = sender.send(event).await;
    }
}
