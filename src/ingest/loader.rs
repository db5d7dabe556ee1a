//! Source document discovery and text extraction.

use crate::error::{HoidapError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// A source document with its extracted text.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path relative to the data directory, used as the source identifier.
    pub source: String,
    /// Extracted plain text.
    pub text: String,
}

/// File extensions the loader knows how to extract.
const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Recursively discover supported files under `data_dir`.
///
/// Returns paths sorted by name so ingestion order is stable across runs.
#[instrument(skip_all, fields(dir = %data_dir.display()))]
pub fn discover_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    if !data_dir.is_dir() {
        return Err(HoidapError::Config(format!(
            "Data directory not found: {}",
            data_dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();

    debug!("Discovered {} source files", files.len());
    Ok(files)
}

/// Extract plain text from a single file.
///
/// Dispatches on extension: PDF goes through `pdf-extract`, text files are
/// read as UTF-8.
pub fn extract_text(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => {
            let bytes = std::fs::read(path)?;
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
                HoidapError::Ingestion(format!(
                    "PDF extraction failed for {}: {}",
                    path.display(),
                    e
                ))
            })
        }
        "txt" => Ok(std::fs::read_to_string(path)?),
        other => Err(HoidapError::Ingestion(format!(
            "Unsupported file type '{}': {}",
            other,
            path.display()
        ))),
    }
}

/// Source identifier for a file: its path relative to the data directory.
pub fn source_id(data_dir: &Path, path: &Path) -> String {
    path.strip_prefix(data_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rules.txt"), "nội quy").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/scoring.txt"), "điểm").unwrap();

        let files = discover_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "txt"));
    }

    #[test]
    fn test_discover_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_files(&missing).is_err());
    }

    #[test]
    fn test_extract_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, "FCAJ là một cộng đồng học AWS.").unwrap();

        let text = extract_text(&path).unwrap();
        assert!(text.contains("FCAJ"));
    }

    #[test]
    fn test_source_id_is_relative() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.txt");
        assert_eq!(source_id(dir.path(), &path), "nested/rules.txt");
    }
}
