//! Model configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model name
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Default completion token limit
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Placeholder key for local servers that do not check credentials
pub const UNSET_API_KEY: &str = "not-set";

/// Settings for an OpenAI-compatible chat completion backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key sent as a bearer token
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum completion tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Custom base URL (local or proxy server)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ModelConfig {
    /// Create a config for the given API key with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Base URL to send requests to, without a trailing slash
    pub fn endpoint(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    ///
    /// Either a real API key or a custom base URL is required; some local
    /// servers accept requests without a key.
    pub fn validate(&self) -> Result<(), String> {
        let has_key = !self.api_key.is_empty() && self.api_key != UNSET_API_KEY;
        if !has_key && self.base_url.is_none() {
            return Err(
                "API key missing. Set OPENAI_API_KEY (or DOC_ANALYSER_API_KEY) or provide a base URL for a local model"
                    .to_string(),
            );
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key() -> String {
    UNSET_API_KEY.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
