//! In-memory vector store implementation.
//!
//! Useful for testing and as the backing store for retrieval unit tests.

use super::{cosine_similarity, Chunk, IndexedSource, SearchResult, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    chunks: RwLock<HashMap<String, Chunk>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, chunks: &[Chunk]) -> Result<usize> {
        let mut store = self.chunks.write().unwrap();
        for chunk in chunks {
            store.insert(chunk.id.to_string(), chunk.clone());
        }
        Ok(chunks.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let chunks = self.chunks.read().unwrap();

        let mut results: Vec<SearchResult> = chunks
            .values()
            .map(|chunk| {
                let score = cosine_similarity(query_embedding, &chunk.embedding);
                SearchResult {
                    chunk: chunk.clone(),
                    score,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let mut chunks = self.chunks.write().unwrap();
        let initial_len = chunks.len();
        chunks.retain(|_, chunk| chunk.source != source);
        Ok(initial_len - chunks.len())
    }

    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let chunks = self.chunks.read().unwrap();

        let mut source_map: HashMap<String, IndexedSource> = HashMap::new();

        for chunk in chunks.values() {
            let entry = source_map
                .entry(chunk.source.clone())
                .or_insert_with(|| IndexedSource {
                    source: chunk.source.clone(),
                    chunk_count: 0,
                    indexed_at: chunk.indexed_at,
                });

            entry.chunk_count += 1;
            if chunk.indexed_at > entry.indexed_at {
                entry.indexed_at = chunk.indexed_at;
            }
        }

        let mut sources: Vec<IndexedSource> = source_map.into_values().collect();
        sources.sort_by(|a, b| a.source.cmp(&b.source));

        Ok(sources)
    }

    async fn chunk_count(&self) -> Result<usize> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let chunk1 = Chunk::new(
            "rules.txt".to_string(),
            "Quy định về điểm số".to_string(),
            0,
            vec![1.0, 0.0, 0.0],
        );
        let chunk2 = Chunk::new(
            "rules.txt".to_string(),
            "Quy định về vi phạm".to_string(),
            1,
            vec![0.0, 1.0, 0.0],
        );

        store.upsert_batch(&[chunk1, chunk2]).await.unwrap();

        assert_eq!(store.chunk_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].chunk_count, 2);
    }
}
