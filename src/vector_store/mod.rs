//! Vector store abstraction for hoidap.
//!
//! Provides a trait-based interface over the persisted document index.
//! The index is written by ingestion and read-only at query time.

mod memory;
pub mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document chunk stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID.
    pub id: Uuid,
    /// Source file this chunk came from (path relative to the data dir).
    pub source: String,
    /// Text content of this chunk.
    pub content: String,
    /// Order of this chunk within its source document.
    pub chunk_index: i32,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(source: String, content: String, chunk_index: i32, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            content,
            chunk_index,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Summary information about an indexed source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedSource {
    /// Source file path.
    pub source: String,
    /// Number of indexed chunks.
    pub chunk_count: u32,
    /// When the source was indexed.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk insert chunks.
    async fn upsert_batch(&self, chunks: &[Chunk]) -> Result<usize>;

    /// Return the `limit` nearest chunks by cosine similarity.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Delete chunks by source file.
    async fn delete_by_source(&self, source: &str) -> Result<usize>;

    /// List all indexed sources.
    async fn list_sources(&self) -> Result<Vec<IndexedSource>>;

    /// Get total chunk count.
    async fn chunk_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Maximal-marginal-relevance selection over a candidate pool.
///
/// Iteratively picks the candidate maximizing
/// `lambda * relevance(candidate, query) - (1 - lambda) * max_sim(candidate, selected)`
/// until `k` chunks are chosen or the pool is exhausted. Candidates are
/// expected to be pre-scored against the query (`SearchResult::score`).
pub fn mmr_select(candidates: Vec<SearchResult>, k: usize, lambda: f32) -> Vec<SearchResult> {
    let mut pool = candidates;
    let mut selected: Vec<SearchResult> = Vec::with_capacity(k.min(pool.len()));

    while selected.len() < k && !pool.is_empty() {
        let mut best_idx = 0;
        let mut best_score = f32::NEG_INFINITY;

        for (idx, candidate) in pool.iter().enumerate() {
            let redundancy = selected
                .iter()
                .map(|s| cosine_similarity(&candidate.chunk.embedding, &s.chunk.embedding))
                .fold(f32::NEG_INFINITY, f32::max);
            let redundancy = if redundancy.is_finite() { redundancy } else { 0.0 };

            let mmr = lambda * candidate.score - (1.0 - lambda) * redundancy;
            if mmr > best_score {
                best_score = mmr;
                best_idx = idx;
            }
        }

        selected.push(pool.swap_remove(best_idx));
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(embedding: Vec<f32>, score: f32) -> SearchResult {
        SearchResult {
            chunk: Chunk::new("a.txt".to_string(), "text".to_string(), 0, embedding),
            score,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_mmr_returns_at_most_k() {
        let candidates = vec![
            result(vec![1.0, 0.0], 0.9),
            result(vec![0.9, 0.1], 0.8),
            result(vec![0.0, 1.0], 0.7),
        ];
        assert_eq!(mmr_select(candidates.clone(), 2, 0.5).len(), 2);
        assert_eq!(mmr_select(candidates, 10, 0.5).len(), 3);
    }

    #[test]
    fn test_mmr_first_pick_is_most_relevant() {
        let candidates = vec![
            result(vec![0.0, 1.0], 0.3),
            result(vec![1.0, 0.0], 0.9),
            result(vec![0.5, 0.5], 0.5),
        ];
        let selected = mmr_select(candidates, 3, 0.5);
        assert!((selected[0].score - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mmr_prefers_diverse_over_redundant() {
        // Two near-duplicates of the top hit plus one orthogonal chunk:
        // the second pick should be the orthogonal one despite its lower
        // relevance score.
        let candidates = vec![
            result(vec![1.0, 0.0], 0.9),
            result(vec![0.99, 0.01], 0.89),
            result(vec![0.0, 1.0], 0.5),
        ];
        let selected = mmr_select(candidates, 2, 0.5);
        assert!((selected[1].chunk.embedding[1] - 1.0).abs() < 0.001);
    }
}
