//! Configuration module for hoidap.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PersonaPrompts, Prompts};
pub use settings::{
    EmbeddingSettings, GeneralSettings, IngestionSettings, LlmSettings, PromptSettings,
    RetrievalSettings, Settings,
};
