//! Document memory for DocChat: an embedded chunk collection persisted as
//! JSON, the indexer that fills it, and the retriever that queries it.

pub mod collection;
pub mod indexer;
pub mod retriever;
pub mod vector;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use collection::{DocumentChunk, VectorCollection};
pub use indexer::{CollectionIndexer, IndexReport};
pub use retriever::EmbeddingRetriever;
pub use vector::{SearchHit, cosine_similarity, vector_search};
