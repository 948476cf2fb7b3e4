//! Error types for the evidence store client

use thiserror::Error;

/// Errors that can occur while talking to the evidence store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The token request failed or returned no token
    #[error("OAuth token request failed: {0}")]
    Auth(String),

    /// The store rejected an evidence payload
    #[error("Evidence store rejected payload ({status}): {body}")]
    Submission {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Network failure or timeout while submitting
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body is not JSON
    #[error("Invalid response from evidence store: {0}")]
    InvalidResponse(String),

    /// A batch stopped at the first failing payload
    #[error("Batch aborted after {submitted} accepted payload(s): {source}")]
    BatchAborted {
        /// Payloads accepted before the failure
        submitted: usize,
        /// Failure of the next payload
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Payloads accepted before the failure; zero unless the batch was partly submitted
    pub fn submitted(&self) -> usize {
        match self {
            StoreError::BatchAborted { submitted, .. } => *submitted,
            _ => 0,
        }
    }
}
