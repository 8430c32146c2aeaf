//! Append-only failure log for the crawler module
//!
//! Every page that could not be fetched is recorded as one line of plain text:
//! `Failed to process <url>: <error message>`.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::crawler::error::CrawlError;

/// Format a single failure line, without the trailing newline
pub fn format_entry(url: &str, error: &dyn Display) -> String {
    format!("Failed to process {}: {}", url, error)
}

/// Handle to the failure log file
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Create a handle for the log at `path`; nothing is written until the first failure
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory holding the log
    pub async fn prepare(&self) -> Result<(), CrawlError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(CrawlError::ErrorLog)?;
            }
        }
        Ok(())
    }

    /// Append one failure line
    pub async fn record(&self, url: &str, error: &dyn Display) -> Result<(), CrawlError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(CrawlError::ErrorLog)?;

        let line = format!("{}\n", format_entry(url, error));
        file.write_all(line.as_bytes())
            .await
            .map_err(CrawlError::ErrorLog)?;
        file.flush().await.map_err(CrawlError::ErrorLog)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry("https://x/1", &"timed out"),
            "Failed to process https://x/1: timed out"
        );
    }

    #[tokio::test]
    async fn test_record_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("raw").join("error_log.txt"));
        log.prepare().await.unwrap();

        log.record("https://x/1", &"first").await.unwrap();
        log.record("https://x/2", &"second").await.unwrap();

        let content = fs::read_to_string(log.path()).await.unwrap();
        assert_eq!(
            content,
            "Failed to process https://x/1: first\nFailed to process https://x/2: second\n"
        );
    }

    #[tokio::test]
    async fn test_record_keeps_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error_log.txt");
        fs::write(&path, "Failed to process https://old: gone\n")
            .await
            .unwrap();

        let log = ErrorLog::new(&path);
        log.record("https://new", &"boom").await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("Failed to process https://old: gone\n"));
        assert!(content.ends_with("Failed to process https://new: boom\n"));
    }
}
