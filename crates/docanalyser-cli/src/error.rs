//! Error types for the CLI application.

use crate::pipeline::PipelineError;
use docanalyser_extractor::CatalogError;
use docanalyser_llm::LlmError;
use docanalyser_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// No documents given and no standalone action requested
    #[error("No files provided. Specify one or more files, or use --test-evidence.")]
    MissingInput,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requirement key not in the catalog
    #[error("Unknown requirement ID: {0}")]
    UnknownRequirement(String),

    /// Requirement catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Loading or analysis failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// LLM transport setup failed
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Evidence store error
    #[error("Evidence store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CliError {
    /// Process exit code: 2 for missing input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingInput => 2,
            _ => 1,
        }
    }
}
