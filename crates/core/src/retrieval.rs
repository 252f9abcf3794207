//! Retriever trait — similarity search over a document collection.
//!
//! Callers hand the returned chunks, in the order given, to the context
//! assembler as retrieved context for a single request.

use crate::error::MemoryError;
use async_trait::async_trait;

/// A retrieval service over document chunks.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// The retriever name (e.g., "embedding").
    fn name(&self) -> &str;

    /// Return up to `top_k` chunk texts, ranked most to least relevant.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>, MemoryError>;
}
