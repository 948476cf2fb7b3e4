//! Configuration for the Evidence Analyser

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of evidence entries requested in general mode
pub const DEFAULT_MAX_ITEMS: usize = 8;

/// Configuration for the Evidence Analyser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Per-requirement model calls allowed in flight at once
    pub max_concurrent_requests: usize,

    /// Evidence entries requested in general mode when the caller does not say
    pub default_max_items: usize,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_concurrent_requests == 0 {
            return Err("max_concurrent_requests must be greater than 0".to_string());
        }
        if self.default_max_items == 0 {
            return Err("default_max_items must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
            max_concurrent_requests: 4,
            default_max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl ExtractorConfig {
    /// One model call at a time, in requirement order
    pub fn sequential() -> Self {
        Self {
            max_concurrent_requests: 1,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
