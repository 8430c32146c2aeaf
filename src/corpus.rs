//! # Corpus Module
//!
//! Record types and newline-delimited JSON storage for the scraped corpus, plus
//! the sentence segmenter used when loading it back for analysis.
//!
//! ## Key Components
//!
//! - `PageRecord`: One scraped page's URL and normalized text
//! - `SentenceRecord`: One sentence (or whole note) with its parent URL
//! - `write_corpus` / `load_corpus`: JSON Lines persistence
//! - `split_sentences`: Boundary heuristic for sentence-split loading

mod error;
mod segment;
mod storage;

pub use error::CorpusError;
pub use segment::{LoadMode, segment, split_sentences};
pub use storage::{LoadOptions, load_corpus, parse_corpus, to_jsonl, write_corpus};

use serde::{Deserialize, Serialize};

/// A scraped page with its normalized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL of the page
    pub url: String,

    /// Whitespace-collapsed, lower-cased text of the page
    pub note: String,
}

/// A sentence, or a whole note, together with the URL it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Text of the sentence
    pub note: String,

    /// URL of the parent page
    pub url: String,
}

impl From<PageRecord> for SentenceRecord {
    fn from(record: PageRecord) -> Self {
        SentenceRecord {
            note: record.note,
            url: record.url,
        }
    }
}
