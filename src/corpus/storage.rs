use std::path::Path;

use serde::Serialize;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument, warn};

use super::error::CorpusError;
use super::segment::{LoadMode, segment};
use super::{PageRecord, SentenceRecord};

type Result<T> = std::result::Result<T, CorpusError>;

/// Options for reading a corpus back
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Whole-note or sentence-split rows
    pub mode: LoadMode,

    /// Skip lines that fail to parse instead of failing the load
    pub skip_malformed: bool,
}

impl LoadOptions {
    /// Set the load mode
    pub fn mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether malformed lines are skipped
    pub fn skip_malformed(mut self, skip_malformed: bool) -> Self {
        self.skip_malformed = skip_malformed;
        self
    }
}

/// Serialize records as JSON Lines, one object per line
pub fn to_jsonl<R: Serialize>(records: &[R]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write records to `path`, replacing any previous file
///
/// Parent directories are created as needed.
#[instrument(skip_all, fields(path = %path.as_ref().display(), count = records.len()))]
pub async fn write_corpus<R: Serialize>(path: impl AsRef<Path>, records: &[R]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let content = to_jsonl(records)?;
    fs::write(path, content).await?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Parse one numbered line, honouring the skip option
fn parse_line(
    number: usize,
    line: &str,
    options: &LoadOptions,
    rows: &mut Vec<SentenceRecord>,
) -> Result<()> {
    if line.trim().is_empty() {
        return Ok(());
    }

    match serde_json::from_str::<PageRecord>(line) {
        Ok(record) => {
            rows.extend(segment(record, options.mode));
            Ok(())
        }
        Err(source) if options.skip_malformed => {
            warn!("Skipping malformed record on line {}: {}", number, source);
            Ok(())
        }
        Err(source) => Err(CorpusError::MalformedLine {
            line: number,
            source,
        }),
    }
}

/// Parse JSON Lines content that is already in memory
pub fn parse_corpus(content: &str, options: &LoadOptions) -> Result<Vec<SentenceRecord>> {
    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        parse_line(index + 1, line, options, &mut rows)?;
    }
    Ok(rows)
}

/// Read a JSON Lines corpus file line by line
///
/// Every line must hold an object with `url` and `note`; other keys are ignored.
/// Blank lines are ignored.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_corpus(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Vec<SentenceRecord>> {
    let file = File::open(path.as_ref()).await?;
    let mut reader = BufReader::new(file);

    let mut rows = Vec::new();
    let mut number = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        number += 1;

        match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim_end_matches(['\n', '\r']);
                parse_line(number, line, options, &mut rows)?;
            }
            Err(source) if options.skip_malformed => {
                warn!("Skipping line {} with invalid UTF-8: {}", number, source);
            }
            Err(source) => {
                return Err(CorpusError::InvalidUtf8 {
                    line: number,
                    source,
                });
            }
        }
    }

    debug!("Loaded {} rows from {} lines", rows.len(), number);
    Ok(rows)
}
