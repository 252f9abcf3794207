//! Error types for the DocChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] aggregates them.

use thiserror::Error;

/// The top-level error type for all DocChat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad token budget, unusable tokenizer, missing credential.
    /// Fatal to the current request and never retried.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Document errors ---
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}

impl Error {
    /// Shorthand for [`Error::InvalidConfiguration`].
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Whether the completions API rejected our credential.
    ///
    /// Callers report this distinctly from every other failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::AuthenticationFailed(_)))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Neither UTF-8 nor the Latin-1 fallback produced text.
    #[error("Could not decode {name}: ensure the file is UTF-8 or Latin-1 encoded")]
    Decoding { name: String },

    #[error("Unsupported document type: {0} (expected .txt, .md or .pdf)")]
    Unsupported(String),

    #[error("Unreadable or corrupt document {name}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn authentication_failure_is_distinguished() {
        let auth = Error::from(ProviderError::AuthenticationFailed("bad key".into()));
        let other = Error::from(ProviderError::Network("reset".into()));
        assert!(auth.is_authentication_failure());
        assert!(!other.is_authentication_failure());
    }

    #[test]
    fn invalid_configuration_message() {
        let err = Error::invalid_configuration("token budget must be positive");
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("token budget must be positive"));
    }

    #[test]
    fn decoding_error_names_the_file() {
        let err = Error::from(DocumentError::Decoding {
            name: "notes.txt".into(),
        });
        assert!(err.to_string().contains("notes.txt"));
        assert!(err.to_string().contains("Latin-1"));
    }

    #[test]
    fn memory_error_converts() {
        let err: Error = MemoryError::EmbeddingFailed("dimension mismatch".into()).into();
        assert!(matches!(err, Error::Memory(MemoryError::EmbeddingFailed(_))));
        assert!(!err.is_authentication_failure());
    }
}
