//! Diversity-aware retrieval over the vector index.

use crate::config::RetrievalSettings;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{mmr_select, SearchResult, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Retrieves the top-k most relevant chunks for a query.
///
/// A larger candidate pool (`fetch_k`) is pulled by plain similarity, then
/// maximal marginal relevance picks `k` chunks that balance relevance
/// against redundancy among themselves. The store is read-only here and
/// safely shared across sessions.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    k: usize,
    fetch_k: usize,
    mmr_lambda: f32,
}

impl Retriever {
    /// Create a retriever from the retrieval settings.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        settings: &RetrievalSettings,
    ) -> Self {
        Self {
            store,
            embedder,
            k: settings.k,
            fetch_k: settings.fetch_k.max(settings.k),
            mmr_lambda: settings.mmr_lambda,
        }
    }

    /// Retrieve up to `k` chunks relevant to `query`.
    #[instrument(skip(self, query))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;

        let candidates = self.store.search(&query_embedding, self.fetch_k).await?;
        debug!("Fetched {} candidates", candidates.len());

        let selected = mmr_select(candidates, self.k, self.mmr_lambda);
        debug!("Selected {} chunks after MMR", selected.len());

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{Chunk, MemoryVectorStore};
    use async_trait::async_trait;

    /// Embedder mapping known keywords onto fixed axes.
    struct KeywordEmbedder;

    fn axis(text: &str) -> Vec<f32> {
        if text.contains("điểm") {
            vec![1.0, 0.0, 0.0]
        } else if text.contains("vi phạm") {
            vec![0.0, 1.0, 0.0]
        } else {
            vec![0.0, 0.0, 1.0]
        }
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(axis(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| axis(t)).collect())
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn model_id(&self) -> &str {
            "keyword-embedder"
        }
    }

    async fn seeded_store() -> Arc<MemoryVectorStore> {
        let store = Arc::new(MemoryVectorStore::new());
        let chunks: Vec<Chunk> = (0..8)
            .map(|i| {
                let content = if i % 2 == 0 {
                    format!("quy định điểm số {}", i)
                } else {
                    format!("quy định vi phạm {}", i)
                };
                Chunk::new("rules.txt".to_string(), content, i, axis(if i % 2 == 0 { "điểm" } else { "vi phạm" }))
            })
            .collect();
        store.upsert_batch(&chunks).await.unwrap();
        store
    }

    fn retriever(store: Arc<MemoryVectorStore>, k: usize, fetch_k: usize) -> Retriever {
        Retriever::new(
            store,
            Arc::new(KeywordEmbedder),
            &RetrievalSettings {
                k,
                fetch_k,
                mmr_lambda: 0.5,
            },
        )
    }

    #[tokio::test]
    async fn test_returns_at_most_k() {
        let store = seeded_store().await;
        let results = retriever(store, 3, 6).retrieve("điểm").await.unwrap();
        assert!(results.len() <= 3);
    }

    #[tokio::test]
    async fn test_results_come_from_indexed_corpus() {
        let store = seeded_store().await;
        let results = retriever(store, 5, 10).retrieve("điểm").await.unwrap();
        for r in &results {
            assert_eq!(r.chunk.source, "rules.txt");
        }
    }

    #[tokio::test]
    async fn test_fetch_k_does_not_change_result_count() {
        let store = seeded_store().await;

        let small_pool = retriever(store.clone(), 4, 5).retrieve("điểm").await.unwrap();
        let large_pool = retriever(store, 4, 8).retrieve("điểm").await.unwrap();

        assert_eq!(small_pool.len(), large_pool.len());
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty() {
        let store = Arc::new(MemoryVectorStore::new());
        let results = retriever(store, 5, 10).retrieve("điểm").await.unwrap();
        assert!(results.is_empty());
    }
}
