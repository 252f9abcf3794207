//! Build a vector collection from documents on disk.
//!
//! Each PDF in a folder is extracted, split into fixed-size chunks, embedded
//! in batches through the configured provider, and added to the collection
//! under its file name.

use crate::collection::VectorCollection;
use docchat_core::error::{Error, MemoryError};
use docchat_core::provider::{EmbeddingRequest, Provider};
use docchat_documents::{DEFAULT_CHUNK_SIZE, LoadedDocument, chunk_text, list_pdfs, load_document};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of chunks sent per embedding request.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Outcome of an indexing run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexReport {
    pub files_indexed: usize,
    pub chunks_added: usize,
    /// Files that could not be read, with the reason.
    pub skipped: Vec<(String, String)>,
}

pub struct CollectionIndexer {
    provider: Arc<dyn Provider>,
    embedding_model: String,
    chunk_size: usize,
    batch_size: usize,
}

impl CollectionIndexer {
    pub fn new(provider: Arc<dyn Provider>, embedding_model: impl Into<String>) -> Self {
        Self {
            provider,
            embedding_model: embedding_model.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Index every PDF directly inside `dir`.
    ///
    /// Unreadable files are logged and skipped; embedding failures abort the
    /// run since every later file would fail the same way.
    pub async fn index_folder(
        &self,
        dir: &Path,
        collection: &mut VectorCollection,
    ) -> Result<IndexReport, Error> {
        let pdfs = list_pdfs(dir)?;
        info!(dir = %dir.display(), files = pdfs.len(), "Indexing folder");

        let mut report = IndexReport::default();
        for path in pdfs {
            let document = match load_document(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable document");
                    report.skipped.push((path.display().to_string(), e.to_string()));
                    continue;
                }
            };

            let added = self.index_document(&document, collection).await?;
            report.files_indexed += 1;
            report.chunks_added += added;
        }

        info!(
            files = report.files_indexed,
            chunks = report.chunks_added,
            skipped = report.skipped.len(),
            "Indexing complete"
        );
        Ok(report)
    }

    /// Chunk, embed and add a single document. Returns chunks added.
    pub async fn index_document(
        &self,
        document: &LoadedDocument,
        collection: &mut VectorCollection,
    ) -> Result<usize, Error> {
        let chunks = chunk_text(&document.text, self.chunk_size);
        if chunks.is_empty() {
            warn!(document = %document.name, "Document has no text, nothing to index");
            return Ok(0);
        }

        let embeddings = self.embed_all(&chunks).await?;
        let added = collection.add_document(&document.name, chunks, embeddings)?;
        info!(document = %document.name, chunks = added, "Indexed document");
        Ok(added)
    }

    async fn embed_all(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, MemoryError> {
        let mut embeddings = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(self.batch_size) {
            debug!(batch = batch.len(), model = %self.embedding_model, "Embedding batch");
            let response = self
                .provider
                .embed(EmbeddingRequest {
                    model: self.embedding_model.clone(),
                    inputs: batch.to_vec(),
                })
                .await
                .map_err(|e| MemoryError::EmbeddingFailed(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(MemoryError::EmbeddingFailed(format!(
                    "Requested {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }
            embeddings.extend(response.embeddings);
        }

        Ok(embeddings)
    }
}
