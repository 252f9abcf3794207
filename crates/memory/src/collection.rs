//! Persistent vector collection of document chunks.
//!
//! The whole collection is one pretty-printed JSON file (default
//! `~/.docchat/db/collection.json`), loaded fully into memory.

use crate::vector::{SearchHit, vector_search};
use chrono::{DateTime, Utc};
use docchat_core::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// One embedded chunk of a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// `"{source}_{chunk_index}"`
    pub id: String,
    /// Source file name (e.g., "handbook.pdf")
    pub source: String,
    pub chunk_index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A named set of embedded chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorCollection {
    pub name: String,
    /// Model that produced the stored embeddings; queries must use the same one.
    pub embedding_model: String,
    pub updated_at: DateTime<Utc>,
    chunks: Vec<DocumentChunk>,
}

impl VectorCollection {
    pub fn new(name: impl Into<String>, embedding_model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            embedding_model: embedding_model.into(),
            updated_at: Utc::now(),
            chunks: Vec::new(),
        }
    }

    /// Add the chunks of one document.
    ///
    /// Chunks previously stored for `source` are replaced. Returns the number
    /// of chunks added.
    pub fn add_document(
        &mut self,
        source: &str,
        chunks: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<usize, MemoryError> {
        if chunks.len() != embeddings.len() {
            return Err(MemoryError::EmbeddingFailed(format!(
                "{source}: {} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let removed = self.remove_source(source);
        if removed > 0 {
            debug!(source, removed, "Replacing previously indexed document");
        }

        let added = chunks.len();
        self.chunks.extend(
            chunks
                .into_iter()
                .zip(embeddings)
                .enumerate()
                .map(|(i, (content, embedding))| DocumentChunk {
                    id: format!("{source}_{i}"),
                    source: source.to_string(),
                    chunk_index: i,
                    content,
                    embedding,
                }),
        );
        self.updated_at = Utc::now();
        Ok(added)
    }

    /// Drop every chunk from `source`. Returns how many were removed.
    pub fn remove_source(&mut self, source: &str) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|c| c.source != source);
        before - self.chunks.len()
    }

    pub fn search(&self, query_embedding: &[f32], top_k: usize, min_score: f32) -> Vec<SearchHit> {
        vector_search(&self.chunks, query_embedding, top_k, min_score)
    }

    pub fn get(&self, id: &str) -> Option<&DocumentChunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    /// Distinct source names, in first-indexed order.
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = Vec::new();
        for chunk in &self.chunks {
            if !sources.contains(&chunk.source.as_str()) {
                sources.push(&chunk.source);
            }
        }
        sources
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Write the collection to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), MemoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemoryError::Storage(format!("Failed to create collection directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| MemoryError::Storage(format!("Failed to serialize collection: {e}")))?;

        std::fs::write(path, content).map_err(|e| {
            MemoryError::Storage(format!("Failed to write {}: {e}", path.display()))
        })?;

        info!(path = %path.display(), chunks = self.len(), "Collection saved");
        Ok(())
    }

    /// Read a collection previously written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, MemoryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MemoryError::Storage(format!("Failed to read {}: {e}", path.display()))
        })?;

        let collection: Self = serde_json::from_str(&content).map_err(|e| {
            MemoryError::Storage(format!("Corrupt collection file {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), chunks = collection.len(), "Collection loaded");
        Ok(collection)
    }

    /// Load `path` if it exists, otherwise start an empty collection.
    pub fn open(
        path: &Path,
        name: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Result<Self, MemoryError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new(name, embedding_model))
        }
    }
}
