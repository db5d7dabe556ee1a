//! Configuration settings for hoidap.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub ingestion: IngestionSettings,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub llm: LlmSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory containing the source documents to index.
    pub data_dir: String,
    /// Path to the persisted vector index.
    pub index_path: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            index_path: "~/.hoidap/index.db".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Document ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}

/// Embedding generation settings.
///
/// The same embedding endpoint must serve both ingestion and query time;
/// an index built with a different model is rejected when opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Base URL of an OpenAI-compatible embeddings endpoint.
    pub api_base: String,
    /// Environment variable holding the API key for that endpoint.
    pub api_key_env: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks returned to the generator.
    pub k: usize,
    /// Size of the candidate pool fed to the MMR selection.
    pub fetch_k: usize,
    /// Relevance/diversity trade-off for MMR (1.0 = pure relevance).
    pub mmr_lambda: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            k: 5,
            fetch_k: 10,
            mmr_lambda: 0.5,
        }
    }
}

/// Hosted LLM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible chat completion endpoint.
    pub api_base: String,
    /// Environment variable holding the API key for that endpoint.
    pub api_key_env: String,
    /// Model for response generation.
    pub model: String,
    /// Decoding temperature (low favors determinism).
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::HoidapError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hoidap")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded index path.
    pub fn index_path(&self) -> PathBuf {
        Self::expand_path(&self.general.index_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let settings = Settings::default();
        assert_eq!(settings.ingestion.chunk_size, 500);
        assert_eq!(settings.ingestion.chunk_overlap, 100);
        assert_eq!(settings.retrieval.k, 5);
        assert_eq!(settings.retrieval.fetch_k, 10);
        assert!((settings.llm.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_roundtrip_toml() {
        let settings = Settings::default();
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.retrieval.fetch_k, settings.retrieval.fetch_k);
        assert_eq!(parsed.llm.model, settings.llm.model);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Settings = toml::from_str("[retrieval]\nk = 3\n").unwrap();
        assert_eq!(parsed.retrieval.k, 3);
        assert_eq!(parsed.retrieval.fetch_k, 10);
        assert_eq!(parsed.ingestion.chunk_size, 500);
    }
}
