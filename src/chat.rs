//! # Chat Module
//!
//! Streaming question answering over a text-generation model.
//!
//! ## Key Components
//!
//! - `ChatConfig`: Instruction, reply length and context size
//! - `build_prompt` / `guard_prompt`: Plain-text prompt assembly with a context-size guard
//! - `TextGenerator`: Seam to any model that can push text fragments into a channel
//! - `CompletionGenerator`: `TextGenerator` over a `rig` completion model
//! - `stream_reply` / `ReplyStream`: Generation on its own task, consumed fragment by fragment
//! - `ChatSession`: Conversation history and prompt building for one user
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use campus_corpus::chat::{ChatConfig, ChatSession, CompletionGenerator};
//! use rig::providers::gemini;
//!
//! # async fn demo() -> Result<(), campus_corpus::chat::ChatError> {
//! let client = gemini::Client::new(&std::env::var("GEMINI_API_KEY").unwrap_or_default());
//! let generator = Arc::new(CompletionGenerator::new(client.completion_model("gemini-2.0-flash")));
//! let mut session = ChatSession::new(generator, ChatConfig::default());
//!
//! let mut reply = session.send("How many students attend W&L?")?;
//! while let Some(partial) = reply.next().await {
//!     println!("{}", partial?);
//! }
//! session.record_turn("How many students attend W&L?", reply.response());
//! # Ok(())
//! # }
//! ```

mod error;
mod generator;
mod prompt;
mod session;
mod stream;

#[cfg(test)]
pub(crate) mod mock_model;

pub use error::ChatError;
pub use generator::{CompletionGenerator, TextGenerator, count_whitespace_tokens};
pub use prompt::{
    ChatConfig, ChatTurn, DEFAULT_CONTEXT_LENGTH, DEFAULT_INSTRUCTION, DEFAULT_MAX_NEW_TOKENS,
    MAX_NEW_TOKENS, MIN_NEW_TOKENS, OVERFLOW_PROMPT, build_prompt, clean_response, guard_prompt,
};
pub use session::ChatSession;
pub use stream::{DEFAULT_RECV_TIMEOUT, ReplyStream, StreamOptions, stream_reply};
