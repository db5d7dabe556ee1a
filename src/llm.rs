//! OpenAI-compatible API client configuration with sensible defaults.
//!
//! Both the chat model (Groq's OpenAI-compatible endpoint) and the embedding
//! endpoint are reached through `async-openai` clients built here.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

use crate::error::{HoidapError, Result};

/// Default timeout for API requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create a client for an OpenAI-compatible endpoint.
///
/// The API key is read from the given environment variable; a missing or
/// empty key is a configuration error, reported before any request is made.
pub fn create_client(api_base: &str, api_key_env: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(api_base, api_key_env, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a client with a custom request timeout.
pub fn create_client_with_timeout(
    api_base: &str,
    api_key_env: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let api_key = read_api_key(api_key_env)?;

    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base)
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Read an API key from the environment, rejecting empty values.
pub fn read_api_key(env_var: &str) -> Result<String> {
    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => Ok(key),
        Ok(_) => Err(HoidapError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            env_var, env_var
        ))),
        Err(_) => Err(HoidapError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            env_var, env_var
        ))),
    }
}
