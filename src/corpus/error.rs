//! Error types for the corpus module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for corpus storage operations
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of the corpus file is not a valid record
    #[error("Malformed record on line {line}: {source}")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// Underlying parse failure
        #[source]
        source: serde_json::Error,
    },

    /// A line of the corpus file is not valid UTF-8
    #[error("Invalid UTF-8 on line {line}: {source}")]
    InvalidUtf8 {
        /// 1-based line number
        line: usize,
        /// Underlying decoding failure
        #[source]
        source: std::str::Utf8Error,
    },

    /// A record could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<CorpusError> for CrateError {
    fn from(err: CorpusError) -> Self {
        match err {
            CorpusError::Io(e) => CrateError::Io(e),
            _ => CrateError::Corpus(err.to_string()),
        }
    }
}
