//! Search command implementation.

use crate::assistant::Assistant;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::normalize::normalize_query;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, mut settings: Settings) -> Result<()> {
    settings.retrieval.k = limit;

    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hoidap doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let assistant = Assistant::open(&settings)?;
    let normalized = normalize_query(query);

    let spinner = Output::spinner("Searching...");
    let results = assistant.retriever().retrieve(&normalized).await;
    spinner.finish_and_clear();

    match results {
        Ok(chunks) => {
            if chunks.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", chunks.len()));

                for result in &chunks {
                    Output::search_result(&result.chunk.source, result.score, &result.chunk.content);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
