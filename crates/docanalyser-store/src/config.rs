//! Evidence store connection settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default evidence store base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default client id and secret of a local evidence store
pub const DEFAULT_CLIENT_CREDENTIAL: &str = "clouditor";

/// Default tool identifier stamped on evidence
pub const DEFAULT_TOOL_ID: &str = "document-analyser";

/// Default target of evaluation
pub const DEFAULT_TARGET_OF_EVALUATION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Default path of the evidence submission endpoint
pub const DEFAULT_EVIDENCE_PATH: &str = "/v1/evidence_store/evidence";

const TOKEN_PATH: &str = "/v1/auth/token";

/// Settings for talking to the evidence store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the evidence store
    pub base_url: String,

    /// OAuth2 token endpoint
    pub token_endpoint: String,

    /// OAuth2 client id
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Tool identifier stamped on evidence
    pub tool_id: String,

    /// Target of evaluation the evidence belongs to
    pub target_of_evaluation_id: String,

    /// Evidence submission path, appended to `base_url`
    pub evidence_path: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl StoreConfig {
    /// Defaults pointed at another base URL; the token endpoint follows it
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            token_endpoint: default_token_endpoint(&base_url),
            base_url,
            client_id: DEFAULT_CLIENT_CREDENTIAL.to_string(),
            client_secret: DEFAULT_CLIENT_CREDENTIAL.to_string(),
            tool_id: DEFAULT_TOOL_ID.to_string(),
            target_of_evaluation_id: DEFAULT_TARGET_OF_EVALUATION_ID.to_string(),
            evidence_path: DEFAULT_EVIDENCE_PATH.to_string(),
            timeout_secs: 15,
        }
    }

    /// Full URL evidence is posted to
    ///
    /// # Examples
    ///
    /// ```
    /// use docanalyser_store::StoreConfig;
    ///
    /// let config = StoreConfig::with_base_url("https://store.example.com/");
    /// assert_eq!(
    ///     config.evidence_url(),
    ///     "https://store.example.com/v1/evidence_store/evidence"
    /// );
    /// ```
    pub fn evidence_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.evidence_path)
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.token_endpoint.trim().is_empty() {
            return Err("token_endpoint must not be empty".to_string());
        }
        if self.tool_id.trim().is_empty() {
            return Err("tool_id must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// `<base>/v1/auth/token`, ignoring a trailing slash on the base
pub fn default_token_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH)
}
