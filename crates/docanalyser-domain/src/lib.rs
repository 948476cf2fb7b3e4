//! Document Analyser Domain Layer
//!
//! Core vocabulary shared by every other crate in the workspace: loaded
//! documents, compliance requirement descriptors, evidence items and the
//! analysis result, plus the trait boundary to the language-model backend.
//!
//! ## Key Concepts
//!
//! - **Document**: decoded text of one input file, immutable once loaded
//! - **Requirement**: catalog entry describing what evidence to look for
//! - **Evidence item**: one normalized extraction record with a fulfilment verdict
//! - **Analysis result**: all evidence items of a run, serialized by the caller
//!
//! ## Architecture
//!
//! This crate holds no I/O. Infrastructure implementations (LLM transport,
//! document loading, evidence store) live in other crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod evidence;
pub mod requirement;
pub mod traits;

// Re-exports for convenience
pub use document::Document;
pub use evidence::{AnalysisResult, Confidence, EvidenceItem};
pub use requirement::{RequirementDescriptor, ResourceKind, DEFAULT_RESPONSE_FIELD};
pub use traits::{ChatMessage, ChatProvider, Role};
