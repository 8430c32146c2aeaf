//! Error types for the chat module

use std::time::Duration;

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for chat generation and streaming
#[derive(Debug, Error)]
pub enum ChatError {
    /// No fragment arrived within the receive timeout
    #[error("No output from the generator within {0:?}")]
    Timeout(Duration),

    /// The model or the generation task failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// The consumer closed the stream before generation finished
    #[error("Generation cancelled")]
    Cancelled,

    /// The message could not be turned into a prompt
    #[error("Invalid chat request: {0}")]
    InvalidRequest(String),
}

impl From<ChatError> for CrateError {
    fn from(err: ChatError) -> Self {
        CrateError::Chat(err.to_string())
    }
}
