//! Evidence store client
//!
//! Authenticates with the OAuth2 client-credentials grant and posts evidence
//! payloads with the resulting bearer token. The token is fetched on first use
//! and reused for the lifetime of the client.

use crate::config::StoreConfig;
use crate::error::StoreError;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Authentication state of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No token fetched yet
    Unauthenticated,
    /// A bearer token is cached
    Authenticated,
}

/// HTTP client for the evidence store
pub struct EvidenceStoreClient {
    config: StoreConfig,
    client: reqwest::Client,
    token: Mutex<Option<String>>,
}

impl EvidenceStoreClient {
    /// Create a client with the configured request timeout
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            config,
            client,
            token: Mutex::new(None),
        })
    }

    /// Connection settings
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether a token has been fetched
    pub async fn state(&self) -> ClientState {
        if self.token.lock().await.is_some() {
            ClientState::Authenticated
        } else {
            ClientState::Unauthenticated
        }
    }

    /// Post one evidence payload
    ///
    /// Returns the store's JSON reply, or an empty object for `204 No Content`.
    pub async fn send_evidence(&self, payload: &Value) -> Result<Value, StoreError> {
        let token = self.access_token().await?;
        let url = self.config.evidence_url();

        debug!(url = %url, "submitting evidence");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %url, "evidence store rejected payload");
            return Err(StoreError::Submission {
                status: status.as_u16(),
                body,
            });
        }

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// Post payloads one after another, stopping at the first failure
    ///
    /// On failure the error is [`StoreError::BatchAborted`], carrying the number
    /// of payloads the store had already accepted.
    pub async fn send_batch(&self, payloads: &[Value]) -> Result<Vec<Value>, StoreError> {
        let mut replies = Vec::with_capacity(payloads.len());
        for payload in payloads {
            match self.send_evidence(payload).await {
                Ok(reply) => replies.push(reply),
                Err(e) => {
                    return Err(StoreError::BatchAborted {
                        submitted: replies.len(),
                        source: Box::new(e),
                    })
                }
            }
        }

        info!(count = replies.len(), "evidence batch submitted");
        Ok(replies)
    }

    /// Release the connection pool
    pub fn close(self) {
        debug!("closing evidence store client");
    }

    async fn access_token(&self) -> Result<String, StoreError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        info!(url = %self.config.token_endpoint, "requesting OAuth token");
        let resp = self
            .client
            .post(&self.config.token_endpoint)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?;

        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("{} {}", status.as_u16(), body)));
        }

        let token = resp
            .json::<TokenResponse>()
            .await
            .map_err(|e| StoreError::Auth(e.to_string()))?
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StoreError::Auth("token response missing access_token".to_string()))?;

        *cached = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_client_is_unauthenticated() {
        let client = EvidenceStoreClient::new(StoreConfig::default()).unwrap();
        assert_eq!(client.state().await, ClientState::Unauthenticated);
        client.close();
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint_is_auth_error() {
        let config = StoreConfig {
            timeout_secs: 2,
            ..StoreConfig::with_base_url("http://127.0.0.1:1")
        };
        let client = EvidenceStoreClient::new(config).unwrap();

        let err = client.send_evidence(&Value::Null).await.unwrap_err();
        assert!(matches!(err, StoreError::Auth(_)));
        assert_eq!(client.state().await, ClientState::Unauthenticated);
    }
}
