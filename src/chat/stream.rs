//! Reply streaming between a generation task and its consumer

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::error::ChatError;
use super::generator::TextGenerator;
use super::prompt::clean_response;

/// How long the consumer waits for the next fragment
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(300);

/// Channel settings for a streamed reply
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Fragments buffered before the generator waits for the consumer
    pub channel_capacity: usize,

    /// Maximum wait for a single fragment
    pub recv_timeout: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
        }
    }
}

impl StreamOptions {
    pub fn channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity.max(1);
        self
    }

    pub fn recv_timeout(mut self, recv_timeout: Duration) -> Self {
        self.recv_timeout = recv_timeout;
        self
    }
}

/// Start generating a reply to `prompt` on its own task
pub fn stream_reply<G: TextGenerator>(
    generator: Arc<G>,
    prompt: String,
    max_new_tokens: usize,
    options: &StreamOptions,
) -> ReplyStream {
    let (sender, receiver) = mpsc::channel(options.channel_capacity.max(1));
    let handle =
        tokio::spawn(async move { generator.generate(prompt, max_new_tokens, sender).await });

    ReplyStream {
        receiver,
        handle: Some(handle),
        text: String::new(),
        recv_timeout: options.recv_timeout,
    }
}

/// Consumer side of a streamed reply
///
/// Every fragment is appended to the raw text and the cleaned response so far
/// is yielded. The stream ends when the generator drops its sender; an error
/// returned by the generator is yielded after the last fragment. Dropping the
/// stream closes the channel, which stops the generator at its next send.
#[derive(Debug)]
pub struct ReplyStream {
    receiver: mpsc::Receiver<String>,
    handle: Option<JoinHandle<Result<(), ChatError>>>,
    text: String,
    recv_timeout: Duration,
}

impl ReplyStream {
    /// Wait for the next fragment and return the cleaned response so far
    ///
    /// Returns `None` once generation has finished and every fragment has been
    /// consumed.
    pub async fn next(&mut self) -> Option<Result<String, ChatError>> {
        match timeout(self.recv_timeout, self.receiver.recv()).await {
            Ok(Some(fragment)) => {
                self.text.push_str(&fragment);
                Some(Ok(clean_response(&self.text)))
            }
            Ok(None) => {
                let handle = self.handle.take()?;
                match handle.await {
                    Ok(Ok(())) => None,
                    Ok(Err(err)) => Some(Err(err)),
                    Err(err) => Some(Err(ChatError::Generation(err.to_string()))),
                }
            }
            Err(_) => {
                warn!("No fragment within {:?}, abandoning generation", self.recv_timeout);
                self.receiver.close();
                if let Some(handle) = self.handle.take() {
                    handle.abort();
                }
                Some(Err(ChatError::Timeout(self.recv_timeout)))
            }
        }
    }

    /// Raw text received so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cleaned response for the text received so far
    pub fn response(&self) -> String {
        clean_response(&self.text)
    }

    /// Consume the rest of the stream and return the final cleaned response
    pub async fn collect(mut self) -> Result<String, ChatError> {
        while let Some(partial) = self.next().await {
            partial?;
        }
        Ok(self.response())
    }

    /// Stop generation and wait for the generator task to exit
    pub async fn cancel(mut self) -> Result<(), ChatError> {
        self.receiver.close();
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.await {
            Ok(Ok(())) | Ok(Err(ChatError::Cancelled)) => {
                debug!("Generation stopped after {} bytes", self.text.len());
                Ok(())
            }
            Ok(Err(err)) => Err(err),
            Err(err) => Err(ChatError::Generation(err.to_string())),
        }
    }
}
