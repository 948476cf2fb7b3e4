//! Document loading
//!
//! PDFs are reduced to page-tagged text; every other file is read as UTF-8,
//! replacing invalid sequences.

use crate::error::LoaderError;
use docanalyser_domain::Document;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Text used when a PDF yields no extractable text
pub const EMPTY_PDF_TEXT: &str = "[No extractable text found in PDF]";

/// Loads documents from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self
    }

    /// Load one document, dispatching on the file extension
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document, LoaderError> {
        load_any_document(path.as_ref())
    }

    /// Load documents in the given order, stopping at the first failure
    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Document>, LoaderError> {
        paths.iter().map(|p| self.load(p)).collect()
    }
}

/// Load a document, treating `.pdf` (any case) as PDF and anything else as text
pub fn load_any_document(path: &Path) -> Result<Document, LoaderError> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        load_pdf_document(path)
    } else {
        load_text_document(path)
    }
}

/// Read a text file, replacing invalid UTF-8
pub fn load_text_document(path: &Path) -> Result<Document, LoaderError> {
    ensure_exists(path)?;
    let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8_lossy(&bytes).into_owned();
    debug!(path = %path.display(), chars = content.len(), "Loaded text document");
    Ok(Document::new(path, content))
}

/// Extract the text of a PDF, one `[Page N]` block per non-blank page
pub fn load_pdf_document(path: &Path) -> Result<Document, LoaderError> {
    ensure_exists(path)?;
    let text = pdf_extract::extract_text(path).map_err(|e| LoaderError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let content = format_pdf_pages(&text);
    if content == EMPTY_PDF_TEXT {
        warn!(path = %path.display(), "PDF has no extractable text");
    }
    Ok(Document::new(path, content))
}

/// Lay out extracted PDF text page by page
///
/// Pages are separated by form feeds in the extractor output.
pub fn format_pdf_pages(text: &str) -> String {
    let pages: Vec<String> = text
        .split('\x0C')
        .enumerate()
        .filter_map(|(idx, page)| {
            let page = page.trim();
            (!page.is_empty()).then(|| format!("[Page {}]\n{}", idx + 1, page))
        })
        .collect();

    if pages.is_empty() {
        EMPTY_PDF_TEXT.to_string()
    } else {
        pages.join("\n\n")
    }
}

/// Join documents into one prompt body, each under a `### Document: <name>` header
pub fn concatenate_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| format!("### Document: {}\n{}\n", doc.name(), doc.content.trim()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn ensure_exists(path: &Path) -> Result<(), LoaderError> {
    if path.exists() {
        Ok(())
    } else {
        Err(LoaderError::NotFound(PathBuf::from(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_text_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.txt");
        fs::write(&path, "Backups run nightly.").unwrap();

        let doc = DocumentLoader::new().load(&path).unwrap();
        assert_eq!(doc.content, "Backups run nightly.");
        assert_eq!(doc.name(), "policy.txt");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.log");
        fs::write(&path, [b'o', b'k', 0xFF, b'!']).unwrap();

        let doc = load_text_document(&path).unwrap();
        assert_eq!(doc.content, "ok\u{FFFD}!");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let err = DocumentLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(p) if p == path));
    }

    #[test]
    fn test_missing_pdf_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_any_document(&dir.path().join("report.PDF")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn test_load_all_preserves_order() {
        let dir = TempDir::new().unwrap();
        let b = dir.path().join("b.md");
        let a = dir.path().join("a.md");
        fs::write(&b, "second").unwrap();
        fs::write(&a, "first").unwrap();

        let docs = DocumentLoader::new().load_all(&[&b, &a]).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["b.md", "a.md"]);
    }

    #[test]
    fn test_format_pdf_pages() {
        let text = "Intro\x0C  \x0CBackups are encrypted.\n";
        assert_eq!(
            format_pdf_pages(text),
            "[Page 1]\nIntro\n\n[Page 3]\nBackups are encrypted."
        );
        assert_eq!(format_pdf_pages(" \x0C\n"), EMPTY_PDF_TEXT);
    }

    #[test]
    fn test_concatenate_documents() {
        let docs = vec![
            Document::new("/tmp/a.txt", "  alpha \n"),
            Document::new("/tmp/b.txt", "beta"),
        ];
        assert_eq!(
            concatenate_documents(&docs),
            "### Document: a.txt\nalpha\n\n### Document: b.txt\nbeta"
        );
        assert_eq!(concatenate_documents(&[]), "");
    }
}
