//! Document Analyser Evidence Store
//!
//! Turns an [`AnalysisResult`](docanalyser_domain::AnalysisResult) into
//! evidence-store payloads and submits them over HTTP.
//!
//! ```text
//! AnalysisResult + Documents → build_evidence_payloads → EvidenceStoreClient → store
//! ```
//!
//! The client authenticates with the OAuth2 client-credentials grant, caches
//! the bearer token for its lifetime and submits batches sequentially,
//! stopping at the first rejected payload.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod error;
mod payload;

pub use client::{ClientState, EvidenceStoreClient};
pub use config::{
    default_token_endpoint, StoreConfig, DEFAULT_BASE_URL, DEFAULT_CLIENT_CREDENTIAL,
    DEFAULT_EVIDENCE_PATH, DEFAULT_TARGET_OF_EVALUATION_ID, DEFAULT_TOOL_ID,
};
pub use error::StoreError;
pub use payload::{build_evidence_payloads, build_test_payload, merge_raw, prune_empty};
