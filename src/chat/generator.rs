//! Text generators that stream fragments into a channel

use std::future::Future;

use rig::agent::AgentBuilder;
use rig::completion::{Chat, CompletionModel};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use super::error::ChatError;
use super::prompt::DEFAULT_CONTEXT_LENGTH;

/// A model that turns a prompt into incremental text fragments
///
/// Implementations push fragments into `sink` as they are produced and return
/// once generation is complete. A failed send means the consumer went away;
/// generation must stop and return [`ChatError::Cancelled`].
pub trait TextGenerator: Send + Sync + 'static {
    /// Number of tokens `text` occupies in the model's context
    fn count_tokens(&self, text: &str) -> usize;

    /// Size of the model's context window in tokens
    fn context_length(&self) -> usize;

    fn generate(
        &self,
        prompt: String,
        max_new_tokens: usize,
        sink: mpsc::Sender<String>,
    ) -> impl Future<Output = Result<(), ChatError>> + Send;
}

/// Whitespace-delimited token count
pub fn count_whitespace_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// [`TextGenerator`] backed by a `rig` completion model
///
/// Each request is a single completion. The reply is forwarded word by word,
/// every fragment carrying its trailing whitespace.
#[derive(Clone)]
pub struct CompletionGenerator<M: CompletionModel> {
    model: M,
    context_length: usize,
}

impl<M: CompletionModel> CompletionGenerator<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            context_length: DEFAULT_CONTEXT_LENGTH,
        }
    }

    /// Set the context window used by the prompt guard
    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }
}

impl<M: CompletionModel + 'static> TextGenerator for CompletionGenerator<M> {
    fn count_tokens(&self, text: &str) -> usize {
        count_whitespace_tokens(text)
    }

    fn context_length(&self) -> usize {
        self.context_length
    }

    #[instrument(skip_all, fields(prompt_len = prompt.len(), max_new_tokens = max_new_tokens))]
    async fn generate(
        &self,
        prompt: String,
        max_new_tokens: usize,
        sink: mpsc::Sender<String>,
    ) -> Result<(), ChatError> {
        let agent = AgentBuilder::new(self.model.clone())
            .max_tokens(max_new_tokens as u64)
            .build();

        let reply = agent
            .chat(prompt.as_str(), Vec::new())
            .await
            .map_err(|e| ChatError::Generation(e.to_string()))?;
        debug!("Model replied with {} bytes", reply.len());

        for fragment in reply.split_inclusive(char::is_whitespace) {
            sink.send(fragment.to_string())
                .await
                .map_err(|_| ChatError::Cancelled)?;
        }
        Ok(())
    }
}
