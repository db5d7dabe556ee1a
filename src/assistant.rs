//! Query-path composition root.
//!
//! Wires the normalizer, retriever, context assembler, and answer generator
//! behind a single facade. Constructed once per process; the index and the
//! API clients it holds are shared read-only across sessions.

use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{HoidapError, Result};
use crate::normalize::normalize_query;
use crate::rag::answer::error_message;
use crate::rag::{
    format_context, question_with_history, AnswerGenerator, Conversation, RagAnswer, Retriever,
    Turn,
};
use crate::vector_store::{
    sqlite::META_EMBEDDING_MODEL, SqliteVectorStore, VectorStore,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// The assembled question-answering pipeline.
pub struct Assistant {
    store: Arc<SqliteVectorStore>,
    retriever: Retriever,
    generator: AnswerGenerator,
}

impl Assistant {
    /// Open the persisted index and assemble the pipeline.
    ///
    /// Fails with a configuration error when the index does not exist
    /// (directing the operator to run ingestion) or when it was built with
    /// a different embedding model than the one configured.
    #[instrument(skip_all)]
    pub fn open(settings: &Settings) -> Result<Self> {
        let store = Arc::new(SqliteVectorStore::open_existing(&settings.index_path())?);

        if let Some(index_model) = store.get_meta(META_EMBEDDING_MODEL)? {
            if index_model != settings.embedding.model {
                return Err(HoidapError::Config(format!(
                    "Index was built with embedding model '{}' but '{}' is configured. \
                     Re-run 'hoidap ingest' or fix the configuration.",
                    index_model, settings.embedding.model
                )));
            }
        }

        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);

        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let retriever = Retriever::new(
            store.clone() as Arc<dyn VectorStore>,
            embedder,
            &settings.retrieval,
        );
        let generator = AnswerGenerator::new(&settings.llm, prompts)?;

        info!("Assistant ready");

        Ok(Self {
            store,
            retriever,
            generator,
        })
    }

    /// Shared handle to the opened index.
    pub fn store(&self) -> Arc<SqliteVectorStore> {
        self.store.clone()
    }

    /// Retrieval-only access, used by the search command and HTTP API.
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer a question in the context of `conversation`.
    ///
    /// The conversation is expected to already contain the question as its
    /// last turn. The question is normalized, prefixed with the transcript
    /// of earlier turns when present, and the combined text drives both
    /// retrieval and generation.
    #[instrument(skip(self, conversation), fields(question = %question))]
    pub async fn ask(&self, conversation: &Conversation, question: &str) -> Result<RagAnswer> {
        let normalized = normalize_query(question);
        let full_question = question_with_history(conversation, &normalized);

        let sources = self.retriever.retrieve(&full_question).await?;
        let context = format_context(&sources);

        let answer = self.generator.generate(&context, &full_question).await?;

        Ok(RagAnswer { answer, sources })
    }

    /// Record `question`, answer it, and record the outcome.
    ///
    /// Never fails the session: a generation error is converted into a
    /// user-visible "⚠️ Lỗi: ..." string, which is still recorded as the
    /// assistant's turn.
    pub async fn respond(&self, conversation: &mut Conversation, question: &str) -> String {
        conversation.push(Turn::user(question));
        let outcome = self.ask(conversation, question).await;
        record_outcome(conversation, outcome)
    }
}

/// Append the outcome of an answer attempt as the assistant's turn.
///
/// Failures become display text here, at the presentation boundary;
/// internally they stay structured `Result`s.
pub fn record_outcome(conversation: &mut Conversation, outcome: Result<RagAnswer>) -> String {
    let answer = match outcome {
        Ok(result) => result.answer,
        Err(e) => error_message(&e),
    };

    conversation.push(Turn::assistant(answer.clone()));
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::answer::ERROR_MARKER;
    use crate::rag::Role;

    #[test]
    fn test_record_outcome_success() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("FCAJ là gì?"));

        let outcome = Ok(RagAnswer {
            answer: "FCAJ là một cộng đồng học AWS.".to_string(),
            sources: Vec::new(),
        });

        let answer = record_outcome(&mut conversation, outcome);
        assert_eq!(answer, "FCAJ là một cộng đồng học AWS.");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_generation_failure_recorded_as_assistant_turn() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("FCAJ là gì?"));

        let outcome = Err(HoidapError::Llm("connection reset".to_string()));

        let answer = record_outcome(&mut conversation, outcome);
        assert!(answer.starts_with(ERROR_MARKER));

        let last = conversation.turns().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.starts_with(ERROR_MARKER));
        assert!(last.content.contains("connection reset"));
    }
}
