//! Token counting.
//!
//! The assembler only needs counts that are consistent within a run, so the
//! default counter is a character heuristic: ~4 bytes per token, which is
//! within ~10% of BPE tokenizers on English text. Exact counts come from a
//! HuggingFace `tokenizer.json` behind the `model-tokenizer` feature.

use docchat_config::{ContextConfig, TokenizerKind};
use docchat_core::error::Error;
use std::sync::Arc;

/// Counts tokens in message content.
pub trait TokenCounter: Send + Sync {
    /// Counter name, reported in assembly metadata.
    fn name(&self) -> &str;

    fn count(&self, text: &str) -> usize;
}

/// Heuristic: 1 token ≈ 4 bytes. Rounds up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateCounter;

impl TokenCounter for ApproximateCounter {
    fn name(&self) -> &str {
        "approximate"
    }

    fn count(&self, text: &str) -> usize {
        estimate_tokens(text)
    }
}

/// Estimate the token count for a string.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.len().div_ceil(4)
}

/// Exact counts from a model's `tokenizer.json`.
#[cfg(feature = "model-tokenizer")]
pub struct ModelTokenizer {
    name: String,
    tokenizer: tokenizers::Tokenizer,
}

#[cfg(feature = "model-tokenizer")]
impl ModelTokenizer {
    pub fn from_file(path: &std::path::Path) -> Result<Self, Error> {
        let tokenizer = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            Error::invalid_configuration(format!(
                "Failed to load tokenizer from {}: {e}",
                path.display()
            ))
        })?;

        tracing::debug!(path = %path.display(), "Model tokenizer loaded");
        Ok(Self {
            name: format!("model:{}", path.display()),
            tokenizer,
        })
    }
}

#[cfg(feature = "model-tokenizer")]
impl TokenCounter for ModelTokenizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        match self.tokenizer.encode(text, false) {
            Ok(encoding) => encoding.get_ids().len(),
            Err(e) => {
                tracing::warn!(error = %e, "Tokenizer encode failed, using estimate");
                estimate_tokens(text)
            }
        }
    }
}

/// Build the counter selected by `[context]` configuration.
pub fn counter_from_config(config: &ContextConfig) -> Result<Arc<dyn TokenCounter>, Error> {
    match config.tokenizer {
        TokenizerKind::Approximate => Ok(Arc::new(ApproximateCounter)),
        TokenizerKind::Model => model_counter(config),
    }
}

#[cfg(feature = "model-tokenizer")]
fn model_counter(config: &ContextConfig) -> Result<Arc<dyn TokenCounter>, Error> {
    let path = config.tokenizer_path.as_ref().ok_or_else(|| {
        Error::invalid_configuration("context.tokenizer = \"model\" requires context.tokenizer_path")
    })?;
    Ok(Arc::new(ModelTokenizer::from_file(path)?))
}

#[cfg(not(feature = "model-tokenizer"))]
fn model_counter(_config: &ContextConfig) -> Result<Arc<dyn TokenCounter>, Error> {
    Err(Error::invalid_configuration(
        "context.tokenizer = \"model\" needs docchat built with the `model-tokenizer` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(ApproximateCounter.count(""), 0);
    }

    #[test]
    fn four_chars_is_one_token() {
        assert_eq!(ApproximateCounter.count("test"), 1);
    }

    #[test]
    fn five_chars_rounds_up() {
        assert_eq!(ApproximateCounter.count("hello"), 2);
    }

    #[test]
    fn hundred_chars() {
        assert_eq!(estimate_tokens(&"a".repeat(100)), 25);
    }

    #[test]
    fn multibyte_counts_bytes() {
        // 3 chars, 6 bytes
        assert_eq!(estimate_tokens("ééé"), 2);
    }

    #[test]
    fn approximate_from_default_config() {
        let counter = counter_from_config(&ContextConfig::default()).unwrap();
        assert_eq!(counter.name(), "approximate");
        assert_eq!(counter.count("abcdefgh"), 2);
    }

    #[test]
    fn model_counter_without_usable_tokenizer_is_invalid_configuration() {
        let config = ContextConfig {
            tokenizer: TokenizerKind::Model,
            tokenizer_path: Some("/nonexistent/tokenizer.json".into()),
            ..ContextConfig::default()
        };
        let err = counter_from_config(&config).err().unwrap();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }
}
