//! Trait definitions for external interactions
//!
//! These traits define the boundary between the analysis logic and the
//! language-model infrastructure, which lives in `docanalyser-llm`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the exchange
    System,
    /// The request itself
    User,
    /// A model reply
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for chat-completion backends
///
/// Implemented by the infrastructure layer (docanalyser-llm)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Error type for provider operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send the messages and return the raw reply text
    ///
    /// With `json_mode` set the provider asks the backend for a JSON-only reply.
    async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String, Self::Error>;
}
