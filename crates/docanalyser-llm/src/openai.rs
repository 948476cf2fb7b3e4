//! OpenAI-compatible Provider Implementation
//!
//! Talks to any server exposing the `/chat/completions` endpoint: the hosted
//! OpenAI API or a local server (Ollama, vLLM, llama.cpp) via a custom base URL.
//!
//! # Features
//!
//! - Async HTTP communication with a bounded request timeout
//! - JSON mode via `response_format: {"type": "json_object"}`
//! - A single attempt per call; failures surface to the caller
//!
//! # Examples
//!
//! ```no_run
//! use docanalyser_llm::{ModelConfig, OpenAiProvider};
//!
//! let provider = OpenAiProvider::new(ModelConfig::new("sk-...")).unwrap();
//! ```

use crate::config::ModelConfig;
use crate::LlmError;
use async_trait::async_trait;
use docanalyser_domain::{ChatMessage, ChatProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// OpenAI-compatible chat completion provider
pub struct OpenAiProvider {
    config: ModelConfig,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ModelConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Model name in use
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Run one chat completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The server is unreachable or the request times out
    /// - The model is not available
    /// - The server rejects the request
    /// - Response format is invalid
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        json_mode: bool,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.endpoint());

        let request_body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: json_mode.then_some(ResponseFormat { kind: "json_object" }),
        };

        debug!(url = %url, model = %self.config.model, json_mode, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    type Error = LlmError;

    async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String, Self::Error> {
        self.complete(messages, json_mode).await
    }
}
