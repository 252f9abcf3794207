//! Embedding-backed retriever over a [`VectorCollection`].

use crate::collection::VectorCollection;
use async_trait::async_trait;
use docchat_core::error::MemoryError;
use docchat_core::provider::{EmbeddingRequest, Provider};
use docchat_core::retrieval::Retriever;
use std::sync::Arc;
use tracing::debug;

/// Embeds the query with the collection's model and returns the closest chunks.
pub struct EmbeddingRetriever {
    provider: Arc<dyn Provider>,
    collection: VectorCollection,
    min_score: f32,
}

impl EmbeddingRetriever {
    pub fn new(provider: Arc<dyn Provider>, collection: VectorCollection) -> Self {
        Self {
            provider,
            collection,
            min_score: 0.0,
        }
    }

    /// Drop chunks scoring below `min_score`.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn collection(&self) -> &VectorCollection {
        &self.collection
    }
}

#[async_trait]
impl Retriever for EmbeddingRetriever {
    fn name(&self) -> &str {
        "embedding"
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>, MemoryError> {
        if self.collection.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.collection.embedding_model.clone(),
                inputs: vec![text.to_string()],
            })
            .await
            .map_err(|e| MemoryError::EmbeddingFailed(e.to_string()))?;

        let query_embedding = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::EmbeddingFailed("Empty embedding response".into()))?;

        let hits = self.collection.search(&query_embedding, top_k, self.min_score);
        debug!(
            collection = %self.collection.name,
            top_k,
            hits = hits.len(),
            best = hits.first().map(|h| h.score).unwrap_or_default(),
            "Retrieved chunks"
        );

        Ok(hits.into_iter().map(|h| h.chunk.content).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::KeywordEmbedder;

    fn pets_collection(embedder: &KeywordEmbedder) -> VectorCollection {
        let chunks = vec![
            "Cats purr and sleep.".to_string(),
            "Dogs bark at the mail carrier.".to_string(),
            "Fish swim; cats watch the fish.".to_string(),
        ];
        let embeddings = chunks.iter().map(|c| embedder.embed_one(c)).collect();
        let mut collection = VectorCollection::new("pets", "test-embed");
        collection.add_document("pets.pdf", chunks, embeddings).unwrap();
        collection
    }

    #[tokio::test]
    async fn returns_most_relevant_first() {
        let embedder = Arc::new(KeywordEmbedder::new(&["cat", "dog", "fish"]));
        let retriever = EmbeddingRetriever::new(embedder.clone(), pets_collection(&embedder));

        let results = retriever.query("Why do dogs bark?", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "Dogs bark at the mail carrier.");
    }

    #[tokio::test]
    async fn min_score_filters_unrelated_chunks() {
        let embedder = Arc::new(KeywordEmbedder::new(&["cat", "dog", "fish"]));
        let retriever = EmbeddingRetriever::new(embedder.clone(), pets_collection(&embedder))
            .with_min_score(0.5);

        let results = retriever.query("dog", 3).await.unwrap();
        assert_eq!(results, vec!["Dogs bark at the mail carrier.".to_string()]);
    }

    #[tokio::test]
    async fn empty_collection_skips_embedding() {
        let embedder = Arc::new(KeywordEmbedder::new(&["cat"]));
        let retriever =
            EmbeddingRetriever::new(embedder.clone(), VectorCollection::new("empty", "m"));

        assert!(retriever.query("cat", 3).await.unwrap().is_empty());
        assert!(embedder.batch_sizes().is_empty());
        assert_eq!(retriever.name(), "embedding");
    }
}
