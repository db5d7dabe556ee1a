//! hoidap - FCAJ Community Assistant
//!
//! A Vietnamese retrieval-augmented-generation assistant for the First
//! Cloud AI Journey (FCAJ) community. Builds a local vector index from
//! program documents and answers questions grounded in it.
//!
//! # Overview
//!
//! hoidap allows you to:
//! - Ingest community documents (.pdf, .txt) into a searchable vector index
//! - Ask questions in Vietnamese and get answers grounded in those documents
//! - Hold multi-turn conversations with history-aware retrieval
//! - Serve the pipeline as an HTTP API for an external chat UI
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `normalize` - Query alias normalization
//! - `ingest` - Document discovery, splitting, and indexing
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector index abstraction
//! - `rag` - Retrieval, context assembly, sessions, answer generation
//! - `assistant` - The assembled question-answering pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use hoidap::assistant::Assistant;
//! use hoidap::config::Settings;
//! use hoidap::rag::Conversation;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let assistant = Assistant::open(&settings)?;
//!
//!     let mut conversation = Conversation::new();
//!     let answer = assistant.respond(&mut conversation, "FCAJ là gì?").await;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod normalize;
pub mod rag;
pub mod vector_store;

pub use error::{HoidapError, Result};
