//! Document Analyser Extractor
//!
//! Turns loaded documents into compliance evidence using an LLM.
//!
//! # Overview
//!
//! Two modes are supported. General mode sends all documents in one request and
//! asks the model for a summary, free-form evidence and gaps. Requirement mode
//! asks one question per catalog requirement and always yields exactly one
//! evidence item per requirement, in requirement order, with a concrete
//! fulfilment verdict.
//!
//! # Architecture
//!
//! ```text
//! Files → DocumentLoader → EvidenceAnalyser → ChatProvider → AnalysisResult
//!                                ↑
//!                        RequirementCatalog
//! ```
//!
//! Model replies that cannot be decoded never fail a run: general mode returns a
//! degraded result carrying the raw reply, requirement mode treats the reply as
//! an empty object (verdict `false`, confidence `low`).
//!
//! # Example Usage
//!
//! ```no_run
//! use docanalyser_extractor::{
//!     AnalysisRequest, DocumentLoader, EvidenceAnalyser, ExtractorConfig, RequirementCatalog,
//! };
//! use docanalyser_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = DocumentLoader::new().load_all(&["policy.pdf"])?;
//! let catalog = RequirementCatalog::builtin()?;
//!
//! let analyser = EvidenceAnalyser::new(MockProvider::default(), ExtractorConfig::default());
//! let request = AnalysisRequest {
//!     requirements: catalog.list(),
//!     ..Default::default()
//! };
//!
//! let result = analyser.analyse(&documents, &request).await?;
//! println!("{}", result.to_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod analyser;
mod catalog;
mod config;
mod error;
mod loader;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use analyser::{AnalysisRequest, EvidenceAnalyser};
pub use catalog::RequirementCatalog;
pub use config::{ExtractorConfig, DEFAULT_MAX_ITEMS};
pub use error::{CatalogError, ExtractorError, LoaderError};
pub use loader::{
    concatenate_documents, format_pdf_pages, load_any_document, load_pdf_document,
    load_text_document, DocumentLoader, EMPTY_PDF_TEXT,
};
pub use parser::{
    coerce_verdict, extract_json, parse_general_reply, parse_requirement_reply, resolve_verdict,
    GeneralReply, ParseOutcome, PARSE_ERROR_REASON,
};
pub use prompt::{GeneralPrompt, RequirementPrompt};
