//! Error types for the Extractor

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Caller supplied unusable input (e.g. no documents)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// A model call exceeded the request timeout
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),
}

/// Errors raised while loading a requirement catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read a catalog file
    #[error("Failed to read catalog file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse catalog TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Two entries share a key
    #[error("Duplicate requirement key: {0}")]
    DuplicateKey(String),

    /// An entry lacks a required value
    #[error("Requirement '{key}' is missing '{field}'")]
    MissingField {
        /// Catalog key of the entry
        key: String,
        /// Name of the missing field
        field: &'static str,
    },
}

/// Errors raised while loading documents
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The path does not exist
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// PDF text extraction failed
    #[error("Failed to extract PDF text from {}: {message}", path.display())]
    Pdf {
        /// Offending path
        path: PathBuf,
        /// Extraction failure description
        message: String,
    },
}
