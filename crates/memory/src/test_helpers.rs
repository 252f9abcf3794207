//! Shared test helpers: a deterministic embedding provider.

use docchat_core::error::ProviderError;
use docchat_core::message::Message;
use docchat_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse,
};
use std::sync::Mutex;

/// Embeds text as keyword counts over a fixed vocabulary.
///
/// Texts sharing vocabulary words end up close in cosine space, which is
/// all retrieval tests need.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    calls: Mutex<Vec<usize>>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self {
            vocabulary: vocabulary.to_vec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Batch sizes of every embed call so far.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.vocabulary
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect()
    }
}

#[async_trait::async_trait]
impl Provider for KeywordEmbedder {
    fn name(&self) -> &str {
        "keyword_embedder"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Ok(ProviderResponse {
            message: Message::assistant("unused"),
            usage: None,
            model: "none".into(),
        })
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        self.calls.lock().unwrap().push(request.inputs.len());
        Ok(EmbeddingResponse {
            embeddings: request.inputs.iter().map(|t| self.embed_one(t)).collect(),
            model: request.model,
            usage: None,
        })
    }
}
