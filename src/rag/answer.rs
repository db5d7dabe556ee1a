//! Answer generation against the hosted LLM.

use crate::config::{LlmSettings, Prompts};
use crate::error::{HoidapError, Result};
use crate::llm::create_client_with_timeout;
use crate::vector_store::SearchResult;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Marker prefixing user-visible error strings at the presentation boundary.
pub const ERROR_MARKER: &str = "⚠️";

/// A generated answer together with the chunks that grounded it.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    /// The LLM's raw text response.
    pub answer: String,
    /// Chunks supplied as context for the answer.
    pub sources: Vec<SearchResult>,
}

/// Generates answers by combining the persona prompt, assembled context,
/// and the (possibly history-prefixed) question into one LLM call.
pub struct AnswerGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl AnswerGenerator {
    /// Create a generator from the LLM settings.
    pub fn new(settings: &LlmSettings, prompts: Prompts) -> Result<Self> {
        let client = create_client_with_timeout(
            &settings.api_base,
            &settings.api_key_env,
            Duration::from_secs(settings.timeout_secs),
        )?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            prompts,
        })
    }

    /// Generate an answer for `question` given the assembled `context`.
    ///
    /// Errors are returned structurally; converting them into a
    /// user-visible "⚠️ Lỗi: ..." string is the caller's job at the
    /// presentation boundary.
    #[instrument(skip(self, context, question))]
    pub async fn generate(&self, context: &str, question: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context.to_string());
        vars.insert("question".to_string(), question.to_string());

        let user_prompt = Prompts::render(&self.prompts.persona.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.persona.system.clone())
                .build()
                .map_err(|e| HoidapError::Llm(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| HoidapError::Llm(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| HoidapError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| HoidapError::Llm(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| HoidapError::Llm("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}

/// Render a generation failure as the user-visible error string.
///
/// The session never crashes on an LLM failure; the turn is recorded with
/// this text as its content instead.
pub fn error_message(error: &HoidapError) -> String {
    format!("{} Lỗi: {}", ERROR_MARKER, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_starts_with_marker() {
        let msg = error_message(&HoidapError::Llm("connection refused".to_string()));
        assert!(msg.starts_with(ERROR_MARKER));
        assert!(msg.contains("connection refused"));
    }
}
