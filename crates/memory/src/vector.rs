//! Vector similarity search over document chunks.
//!
//! Pure-Rust cosine similarity and top-k ranking; collections are small
//! enough that a linear scan is fine.

use crate::collection::DocumentChunk;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// A chunk paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Rank chunks by cosine similarity to a query embedding.
///
/// Returns at most `top_k` hits sorted by descending similarity. Chunks
/// below `min_score` are dropped. Equal scores keep collection order.
pub fn vector_search(
    chunks: &[DocumentChunk],
    query_embedding: &[f32],
    top_k: usize,
    min_score: f32,
) -> Vec<SearchHit> {
    let mut scored: Vec<SearchHit> = chunks
        .iter()
        .filter_map(|chunk| {
            let score = cosine_similarity(&chunk.embedding, query_embedding);
            (score >= min_score).then(|| SearchHit {
                chunk: chunk.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, embedding: Vec<f32>) -> DocumentChunk {
        DocumentChunk {
            id: id.into(),
            source: "test.pdf".into(),
            chunk_index: 0,
            content: format!("Content for {id}"),
            embedding,
        }
    }

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn cosine_known_value() {
        // 1 / sqrt(2)
        let sim = cosine_similarity(&[1.0, 1.0], &[1.0, 0.0]);
        assert!((sim - 0.7071).abs() < 0.001);
    }

    #[test]
    fn ranks_by_similarity() {
        let chunks = vec![
            chunk("a", vec![0.0, 1.0, 0.0]),
            chunk("b", vec![1.0, 0.0, 0.0]),
            chunk("c", vec![0.5, 0.5, 0.0]),
        ];

        let hits = vector_search(&chunks, &[1.0, 0.0, 0.0], 10, 0.0);
        let ids: Vec<_> = hits.iter().map(|h| h.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn respects_min_score() {
        let chunks = vec![chunk("a", vec![1.0, 0.0]), chunk("b", vec![0.0, 1.0])];
        let hits = vector_search(&chunks, &[1.0, 0.0], 10, 0.5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.id, "a");
    }

    #[test]
    fn respects_top_k() {
        let chunks: Vec<_> = (0..10)
            .map(|i| chunk(&format!("c{i}"), vec![1.0, i as f32 * 0.1]))
            .collect();
        assert_eq!(vector_search(&chunks, &[1.0, 0.0], 3, 0.0).len(), 3);
        assert!(vector_search(&chunks, &[1.0, 0.0], 0, 0.0).is_empty());
    }

    #[test]
    fn ties_keep_collection_order() {
        let chunks = vec![chunk("first", vec![1.0, 0.0]), chunk("second", vec![2.0, 0.0])];
        let hits = vector_search(&chunks, &[1.0, 0.0], 2, 0.0);
        assert_eq!(hits[0].chunk.id, "first");
        assert_eq!(hits[1].chunk.id, "second");
    }
}
