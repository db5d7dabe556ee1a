//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials and the persisted index are
//! available before starting operations that would otherwise fail midway
//! or silently answer from an empty index.

use crate::config::Settings;
use crate::error::{HoidapError, Result};
use crate::llm::read_api_key;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingestion requires the embedding API key.
    Ingest,
    /// Asking questions requires both API keys and the persisted index.
    Ask,
    /// Search requires the embedding API key and the persisted index.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ingest => {
            read_api_key(&settings.embedding.api_key_env)?;
        }
        Operation::Ask => {
            read_api_key(&settings.embedding.api_key_env)?;
            read_api_key(&settings.llm.api_key_env)?;
            check_index(settings)?;
        }
        Operation::Search => {
            read_api_key(&settings.embedding.api_key_env)?;
            check_index(settings)?;
        }
    }
    Ok(())
}

/// Check that the persisted index exists.
///
/// A missing index is a fatal configuration error at query time; the
/// operator is directed to run ingestion instead of getting a degraded
/// empty-context answer.
fn check_index(settings: &Settings) -> Result<()> {
    let index_path = settings.index_path();
    if !index_path.exists() {
        return Err(HoidapError::Config(format!(
            "No vector index found at {}. Run 'hoidap ingest' to build one first.",
            index_path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_is_config_error() {
        let mut settings = Settings::default();
        settings.general.index_path = "/nonexistent/hoidap-test/index.db".to_string();

        let err = check_index(&settings).unwrap_err();
        assert!(matches!(err, HoidapError::Config(_)));
        assert!(err.to_string().contains("ingest"));
    }
}
