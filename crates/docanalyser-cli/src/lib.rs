//! Document Analyser CLI library.
//!
//! Command-line parsing, layered configuration, and the pipeline that ties the
//! loader, the analyser and the evidence store together.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

pub use cli::{AnalysisMode, Cli};
pub use config::{auto_push_enabled, parse_evidence_auth, AppConfig};
pub use error::{CliError, Result};
pub use pipeline::{DocumentAnalysisPipeline, EvidencePublisher, PipelineError, PipelineRun, PublishOutcome};
