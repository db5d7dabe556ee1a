//! Document ingestion pipeline.
//!
//! Transforms a directory of source files into the persisted vector index:
//! discover -> extract -> split -> embed -> index.

mod loader;
mod splitter;

pub use loader::{discover_files, extract_text, source_id, SourceDocument};
pub use splitter::RecursiveSplitter;

use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::vector_store::{
    sqlite::{META_DIMENSIONS, META_EMBEDDING_MODEL},
    Chunk, SqliteVectorStore, VectorStore,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Result of an ingestion run.
#[derive(Debug)]
pub struct IngestReport {
    /// Files discovered under the data directory.
    pub files_found: usize,
    /// Files skipped because extraction failed.
    pub files_skipped: usize,
    /// Total chunks written to the index.
    pub chunks_indexed: usize,
}

/// The offline ingestion pipeline.
pub struct Ingestor {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    splitter: RecursiveSplitter,
}

impl Ingestor {
    /// Create an ingestor from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);
        let splitter = RecursiveSplitter::new(
            settings.ingestion.chunk_size,
            settings.ingestion.chunk_overlap,
        );

        Ok(Self {
            settings,
            embedder,
            splitter,
        })
    }

    /// Create an ingestor with a custom embedder (for tests).
    pub fn with_embedder(settings: Settings, embedder: Arc<dyn Embedder>) -> Self {
        let splitter = RecursiveSplitter::new(
            settings.ingestion.chunk_size,
            settings.ingestion.chunk_overlap,
        );
        Self {
            settings,
            embedder,
            splitter,
        }
    }

    /// Build the index from the configured data directory, replacing any
    /// prior index at the configured location.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<IngestReport> {
        let data_dir = self.settings.data_dir();
        let index_path = self.settings.index_path();

        let store = SqliteVectorStore::create(&index_path)?;
        store.set_meta(META_EMBEDDING_MODEL, self.embedder.model_id())?;
        store.set_meta(META_DIMENSIONS, &self.embedder.dimensions().to_string())?;

        let report = self.ingest_into(&data_dir, &store).await?;

        info!(
            "Ingestion complete: {} chunks from {} files ({} skipped)",
            report.chunks_indexed, report.files_found, report.files_skipped
        );
        Ok(report)
    }

    /// Ingest all documents under `data_dir` into `store`.
    ///
    /// An empty directory yields an empty index with a warning, not an
    /// error. Individual unreadable files are skipped with a warning.
    pub async fn ingest_into(&self, data_dir: &Path, store: &dyn VectorStore) -> Result<IngestReport> {
        let files = discover_files(data_dir)?;

        if files.is_empty() {
            warn!(
                "No .pdf or .txt files found under {}; the index will be empty",
                data_dir.display()
            );
        }

        let mut report = IngestReport {
            files_found: files.len(),
            files_skipped: 0,
            chunks_indexed: 0,
        };

        for path in &files {
            let source = source_id(data_dir, path);

            let text = match extract_text(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping {}: {}", source, e);
                    report.files_skipped += 1;
                    continue;
                }
            };

            let document = SourceDocument { source, text };
            report.chunks_indexed += self.index_document(&document, store).await?;
        }

        Ok(report)
    }

    /// Split, embed, and index one document.
    async fn index_document(
        &self,
        document: &SourceDocument,
        store: &dyn VectorStore,
    ) -> Result<usize> {
        let pieces = self.splitter.split(&document.text);
        if pieces.is_empty() {
            warn!("No text extracted from {}", document.source);
            return Ok(0);
        }

        info!("Indexing {} ({} chunks)", document.source, pieces.len());

        // Replace any prior chunks for this source
        store.delete_by_source(&document.source).await?;

        let embeddings = self.embedder.embed_batch(&pieces).await?;

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(order, (content, embedding))| {
                Chunk::new(document.source.clone(), content, order as i32, embedding)
            })
            .collect();

        store.upsert_batch(&chunks).await
    }
}
