//! SQLite-based persisted vector index.
//!
//! Uses SQLite with cosine similarity computed in Rust. The corpus is a few
//! hundred chunks of community documents; a dedicated ANN index would be
//! overkill at this scale.

use super::{cosine_similarity, Chunk, IndexedSource, SearchResult, VectorStore};
use crate::error::{HoidapError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// Meta key recording which embedding model built the index.
pub const META_EMBEDDING_MODEL: &str = "embedding_model";
/// Meta key recording the embedding dimensions.
pub const META_DIMENSIONS: &str = "dimensions";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    content TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// SQLite-backed vector store.
#[derive(Debug)]
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Create a fresh index at `path`, replacing any existing one.
    ///
    /// This is the ingestion-time entry point.
    #[instrument(skip_all)]
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Created vector index at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an existing index at `path`.
    ///
    /// This is the query-time entry point. A missing index is a fatal
    /// configuration error; the system must not silently proceed with an
    /// empty index.
    #[instrument(skip_all)]
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HoidapError::Config(format!(
                "No vector index found at {}. Run 'hoidap ingest' to build one first.",
                path.display()
            )));
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        debug!("Opened vector index at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory index (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Record a meta key/value pair (e.g. the embedding model id).
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Read a meta value.
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| HoidapError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_chunk(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chunk> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(4)?;
        let indexed_at_str: String = row.get(5)?;

        Ok(Chunk {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            source: row.get(1)?,
            content: row.get(2)?,
            chunk_index: row.get(3)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, chunks))]
    async fn upsert_batch(&self, chunks: &[Chunk]) -> Result<usize> {
        let conn = self.lock()?;

        let tx = conn.unchecked_transaction()?;

        for chunk in chunks {
            let embedding_bytes = Self::embedding_to_bytes(&chunk.embedding);

            tx.execute(
                r#"
                INSERT OR REPLACE INTO chunks
                (id, source, content, chunk_index, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    chunk.id.to_string(),
                    chunk.source,
                    chunk.content,
                    chunk.chunk_index,
                    embedding_bytes,
                    chunk.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch inserted {} chunks", chunks.len());
        Ok(chunks.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, source, content, chunk_index, embedding, indexed_at FROM chunks",
        )?;

        let chunks = stmt.query_map([], Self::row_to_chunk)?;

        let mut results: Vec<SearchResult> = chunks
            .filter_map(|chunk_result| chunk_result.ok())
            .map(|chunk| {
                let score = cosine_similarity(query_embedding, &chunk.embedding);
                SearchResult { chunk, score }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching chunks", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let conn = self.lock()?;

        let deleted = conn.execute("DELETE FROM chunks WHERE source = ?1", params![source])?;

        debug!("Deleted {} chunks for source {}", deleted, source);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source, COUNT(*) as chunk_count, MAX(indexed_at) as indexed_at
            FROM chunks
            GROUP BY source
            ORDER BY source
            "#,
        )?;

        let sources = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(2)?;
            Ok(IndexedSource {
                source: row.get(0)?,
                chunk_count: row.get(1)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let result: Vec<IndexedSource> = sources.filter_map(|s| s.ok()).collect();
        Ok(result)
    }

    async fn chunk_count(&self) -> Result<usize> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let chunk = Chunk::new(
            "rules.txt".to_string(),
            "Nội quy cộng đồng".to_string(),
            0,
            vec![1.0, 0.0, 0.0],
        );

        store.upsert_batch(&[chunk]).await.unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, "rules.txt");

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);

        let deleted = store.delete_by_source("rules.txt").await.unwrap();
        assert_eq!(deleted, 1);

        assert_eq!(store.chunk_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_meta_roundtrip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        assert!(store.get_meta(META_EMBEDDING_MODEL).unwrap().is_none());

        store
            .set_meta(META_EMBEDDING_MODEL, "text-embedding-3-small")
            .unwrap();
        assert_eq!(
            store.get_meta(META_EMBEDDING_MODEL).unwrap().as_deref(),
            Some("text-embedding-3-small")
        );
    }

    #[test]
    fn test_open_existing_missing_index_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        let err = SqliteVectorStore::open_existing(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ingest"), "error should direct to ingestion: {}", msg);
    }

    #[test]
    fn test_create_replaces_existing_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");

        std::fs::write(&path, b"not a database").unwrap();
        let store = SqliteVectorStore::create(&path).unwrap();
        drop(store);

        let reopened = SqliteVectorStore::open_existing(&path).unwrap();
        drop(reopened);
    }
}
