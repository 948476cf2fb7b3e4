//! Document Analyser LLM Provider Layer
//!
//! Implementations of the [`ChatProvider`] trait from `docanalyser-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completion API (remote or local server)
//!
//! # Examples
//!
//! ```
//! use docanalyser_llm::MockProvider;
//! use docanalyser_domain::{ChatMessage, ChatProvider};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("{\"ok\": true}");
//! let reply = provider.chat(&[ChatMessage::user("hi")], true).await.unwrap();
//! assert_eq!(reply, "{\"ok\": true}");
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod openai;

use async_trait::async_trait;
use docanalyser_domain::{ChatMessage, ChatProvider};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use config::ModelConfig;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

const ERROR_MARKER: &str = "\u{0}ERROR";

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen by the first registered pattern contained in the last
/// message of the request; otherwise the default response is returned. Every
/// request is recorded so tests can inspect the rendered prompts.
///
/// # Examples
///
/// ```
/// use docanalyser_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("E83", r#"{"businessContinuityPolicy": true}"#);
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, String)>>>,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

/// A request captured by [`MockProvider`]
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Messages as sent
    pub messages: Vec<ChatMessage>,
    /// Whether JSON mode was requested
    pub json_mode: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` when the last message contains `pattern`
    pub fn add_response(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((pattern.into(), response.into()));
    }

    /// Fail requests whose last message contains `pattern`
    pub fn add_error(&mut self, pattern: impl Into<String>) {
        lock(&self.responses).push((pattern.into(), ERROR_MARKER.to_string()));
    }

    /// Get the number of times chat was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<MockRequest> {
        lock(&self.requests).clone()
    }

    /// Forget recorded requests
    pub fn reset(&self) {
        lock(&self.requests).clear();
    }

    fn reply_for(&self, messages: &[ChatMessage]) -> Option<String> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        lock(&self.responses)
            .iter()
            .find(|(pattern, _)| last.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    type Error = LlmError;

    async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String, Self::Error> {
        lock(&self.requests).push(MockRequest {
            messages: messages.to_vec(),
            json_mode,
        });

        match self.reply_for(messages) {
            Some(response) if response == ERROR_MARKER => {
                Err(LlmError::Other("Mock error".to_string()))
            }
            Some(response) => Ok(response),
            None => Ok(self.default_response.clone()),
        }
    }
}
