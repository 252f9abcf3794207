//! Text extraction from files on disk or raw uploads.

use crate::decode::decode_text;
use crate::kind::DocumentKind;
use docchat_core::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A document whose text has been extracted and is ready to chat about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedDocument {
    /// File name without directories (e.g., "report.pdf")
    pub name: String,
    pub kind: DocumentKind,
    pub text: String,
}

impl LoadedDocument {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Read a file and extract its text, detecting the kind from the extension.
pub fn load_document(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let kind = DocumentKind::from_path(path)?;
    let name = file_name(path);
    let bytes = std::fs::read(path).map_err(|e| DocumentError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let text = extract_bytes(&bytes, kind, &name)?;
    info!(document = %name, kind = %kind, chars = text.chars().count(), "Document loaded");

    Ok(LoadedDocument { name, kind, text })
}

/// Read a file and return only its text.
pub fn extract_text(path: &Path) -> Result<String, DocumentError> {
    load_document(path).map(|doc| doc.text)
}

/// Extract text from raw bytes of a known kind.
pub fn extract_bytes(bytes: &[u8], kind: DocumentKind, name: &str) -> Result<String, DocumentError> {
    match kind {
        DocumentKind::PlainText | DocumentKind::Markdown => decode_text(bytes, name),
        DocumentKind::Pdf => extract_pdf(bytes, name),
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(bytes: &[u8], name: &str) -> Result<String, DocumentError> {
    debug!(document = name, bytes = bytes.len(), "Extracting PDF text");
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Corrupt {
        name: name.into(),
        reason: e.to_string(),
    })
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_bytes: &[u8], name: &str) -> Result<String, DocumentError> {
    debug!(document = name, "PDF support not compiled in");
    Err(DocumentError::Unsupported(format!(
        "{name} (built without the `pdf` feature)"
    )))
}

/// List the `.pdf` files directly inside `dir`, sorted by path.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, DocumentError> {
    if !dir.is_dir() {
        return Err(DocumentError::FolderNotFound(dir.display().to_string()));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| DocumentError::Io {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && DocumentKind::from_path(path).ok() == Some(DocumentKind::Pdf))
        .collect();
    pdfs.sort();

    debug!(dir = %dir.display(), count = pdfs.len(), "Listed PDFs");
    Ok(pdfs)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Title\n\nBody text.").unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc.name, "notes.md");
        assert_eq!(doc.kind, DocumentKind::Markdown);
        assert_eq!(doc.text, "# Title\n\nBody text.");
        assert!(!doc.is_empty());
    }

    #[test]
    fn load_latin1_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        std::fs::write(&path, b"na\xEFve r\xE9sum\xE9").unwrap();

        assert_eq!(extract_text(&path).unwrap(), "naïve résumé");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_document(Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn unsupported_checked_before_reading() {
        let err = load_document(Path::new("/nonexistent/photo.jpg")).unwrap_err();
        assert!(matches!(err, DocumentError::Unsupported(_)));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn garbage_pdf_is_corrupt() {
        let err = extract_bytes(b"this is not a pdf", DocumentKind::Pdf, "fake.pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Corrupt { .. }));
    }

    #[test]
    fn list_pdfs_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let names: Vec<String> = list_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn list_pdfs_missing_folder() {
        let err = list_pdfs(Path::new("/nonexistent/docs")).unwrap_err();
        assert!(matches!(err, DocumentError::FolderNotFound(_)));
    }
}
