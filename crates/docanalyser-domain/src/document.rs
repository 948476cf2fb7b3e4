//! Loaded document module

use std::path::{Path, PathBuf};

/// A document whose text has already been extracted
///
/// Documents are produced by the loader before analysis starts and are never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Filesystem locator of the source file
    pub path: PathBuf,
    /// Decoded text content
    pub content: String,
}

impl Document {
    /// Create a document from a path and its decoded text
    ///
    /// # Examples
    ///
    /// ```
    /// use docanalyser_domain::Document;
    ///
    /// let doc = Document::new("docs/policy.txt", "All data is encrypted.");
    /// assert_eq!(doc.name(), "policy.txt");
    /// ```
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Display name: the final path component
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// File extension without the leading dot, if any
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    }

    /// Path rendered as a string
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Borrow the path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
