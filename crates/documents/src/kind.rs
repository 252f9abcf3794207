//! Supported document kinds.

use docchat_core::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PlainText,
    Markdown,
    Pdf,
}

impl DocumentKind {
    /// Detect the kind from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(Self::PlainText),
            "md" | "markdown" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            _ => Err(DocumentError::Unsupported(path.display().to_string())),
        }
    }

    /// Detect the kind from a MIME type such as `text/plain; charset=utf-8`.
    pub fn from_mime(mime: &str) -> Result<Self, DocumentError> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "text/plain" => Ok(Self::PlainText),
            "text/markdown" | "text/x-markdown" => Ok(Self::Markdown),
            "application/pdf" => Ok(Self::Pdf),
            _ => Err(DocumentError::Unsupported(mime.to_string())),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::PlainText | Self::Markdown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
