//! Conversation state for one chat user

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::ChatError;
use super::generator::TextGenerator;
use super::prompt::{ChatConfig, ChatTurn, build_prompt, guard_prompt};
use super::stream::{ReplyStream, StreamOptions, stream_reply};

/// History and settings shared by every message of a conversation
pub struct ChatSession<G: TextGenerator> {
    generator: Arc<G>,
    config: ChatConfig,
    stream_options: StreamOptions,
    history: Vec<ChatTurn>,
}

impl<G: TextGenerator> ChatSession<G> {
    pub fn new(generator: Arc<G>, config: ChatConfig) -> Self {
        Self {
            generator,
            config,
            stream_options: StreamOptions::default(),
            history: Vec::new(),
        }
    }

    pub fn with_stream_options(mut self, stream_options: StreamOptions) -> Self {
        self.stream_options = stream_options;
        self
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Prompt for `message` after the current history, guarded against overflow
    pub fn prompt_for(&self, message: &str) -> String {
        let prompt = build_prompt(&self.config.instruction, &self.history, message);
        let tokens = self.generator.count_tokens(&prompt);
        let context_length = self.generator.context_length();
        if tokens >= context_length.saturating_sub(self.config.max_new_tokens) {
            warn!(
                "Prompt of {} tokens does not fit a context of {} with {} new tokens",
                tokens, context_length, self.config.max_new_tokens
            );
        }
        guard_prompt(prompt, tokens, context_length, self.config.max_new_tokens)
    }

    /// Start streaming a reply to `message`
    ///
    /// The exchange is not added to the history; call [`record_turn`](Self::record_turn)
    /// with the final response once the stream is done.
    pub fn send(&self, message: &str) -> Result<ReplyStream, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::InvalidRequest("message is empty".to_string()));
        }

        let prompt = self.prompt_for(message);
        debug!("Sending prompt of {} bytes", prompt.len());
        Ok(stream_reply(
            self.generator.clone(),
            prompt,
            self.config.max_new_tokens,
            &self.stream_options,
        ))
    }

    pub fn record_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(ChatTurn {
            user: user.into(),
            assistant: assistant.into(),
        });
    }

    pub fn clear_history(&mut self) {
        info!("Clearing {} turns of chat history", self.history.len());
        self.history.clear();
    }
}
