//! Scripted models for exercising the chat pipeline without a provider

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    one_or_many::OneOrMany,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

use super::{ChatError, TextGenerator, count_whitespace_tokens};

/// Scripted outcome of the next completion
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error(String),
}

/// Completion model that answers every request with the scripted reply
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    reply: Arc<Mutex<Reply>>,
    max_tokens: Arc<Mutex<Vec<Option<u64>>>>,
}

impl MockCompletionModel {
    /// A model that replies with empty text
    pub fn new() -> Self {
        Self {
            reply: Arc::new(Mutex::new(Reply::Text(String::new()))),
            max_tokens: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn set_text_response(&self, text: &str) {
        *self.reply.lock().await = Reply::Text(text.to_string());
    }

    /// Fail every request with a provider error carrying `message`
    pub async fn set_error(&self, message: &str) {
        *self.reply.lock().await = Reply::Error(message.to_string());
    }

    /// `max_tokens` of every request received so far
    pub async fn requested_max_tokens(&self) -> Vec<Option<u64>> {
        self.max_tokens.lock().await.clone()
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        self.max_tokens.lock().await.push(request.max_tokens);
        let reply = self.reply.lock().await.clone();
        match reply {
            Reply::Text(text) => Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text(&text)),
                raw_response: text,
            }),
            Reply::Error(message) => Err(CompletionError::ProviderError(message)),
        }
    }
}

/// Generator that replays fixed fragments, optionally pausing before each one
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    pub fragments: Vec<String>,
    pub delay: Option<Duration>,
    pub failure: Option<String>,
    pub context_length: usize,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub sent: Arc<AtomicUsize>,
}

impl ScriptedGenerator {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            context_length: 2048,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl TextGenerator for ScriptedGenerator {
    fn count_tokens(&self, text: &str) -> usize {
        count_whitespace_tokens(text)
    }

    fn context_length(&self) -> usize {
        self.context_length
    }

    async fn generate(
        &self,
        prompt: String,
        _max_new_tokens: usize,
        sink: mpsc::Sender<String>,
    ) -> Result<(), ChatError> {
        self.prompts.lock().await.push(prompt);
        for fragment in &self.fragments {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            sink.send(fragment.clone())
                .await
                .map_err(|_| ChatError::Cancelled)?;
            self.sent.fetch_add(1, Ordering::SeqCst);
        }
        match &self.failure {
            Some(message) => Err(ChatError::Generation(message.clone())),
            None => Ok(()),
        }
    }
}
