//! Ingest command - build the vector index from the data directory.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::Ingestor;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(data_dir: Option<String>, mut settings: Settings) -> Result<()> {
    if let Some(dir) = data_dir {
        settings.general.data_dir = dir;
    }

    if let Err(e) = preflight::check(Operation::Ingest, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hoidap doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Output::info(&format!(
        "Ingesting documents from {}",
        settings.data_dir().display()
    ));

    let ingestor = Ingestor::new(settings.clone())?;

    let spinner = Output::spinner("Splitting, embedding, and indexing...");
    let result = ingestor.run().await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            if report.files_found == 0 {
                Output::warning("No .pdf or .txt files found; the index is empty.");
            }
            Output::success(&format!(
                "Indexed {} chunks from {} files",
                report.chunks_indexed,
                report.files_found - report.files_skipped
            ));
            if report.files_skipped > 0 {
                Output::warning(&format!(
                    "{} file(s) skipped (see log for details)",
                    report.files_skipped
                ));
            }
            Output::kv("Index", &settings.index_path().display().to_string());
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
