//! CLI module for hoidap.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// hoidap - FCAJ community assistant
///
/// A Vietnamese RAG assistant for the First Cloud AI Journey (FCAJ)
/// community. Builds a local vector index from program documents and
/// answers questions grounded in it.
#[derive(Parser, Debug)]
#[command(name = "hoidap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize hoidap and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Build (or rebuild) the vector index from the data directory
    Ingest {
        /// Directory containing source documents (.pdf, .txt)
        #[arg(short, long)]
        data_dir: Option<String>,
    },

    /// Ask a single question and get a grounded answer
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,

        /// Number of context chunks to retrieve
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Search the index and show matching chunks (no LLM call)
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Start an interactive chat session
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List indexed source documents
    List,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
