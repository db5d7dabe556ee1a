//! RAG (Retrieval-Augmented Generation) for grounded question answering.
//!
//! Retrieval pulls relevant chunks from the index, the context assembler
//! turns them (and any conversation history) into prompt text, and the
//! answer generator sends the combined prompt to the hosted LLM.

pub mod answer;
pub mod context;
pub mod retriever;
pub mod session;

pub use answer::{AnswerGenerator, RagAnswer};
pub use context::{format_context, format_history, question_with_history};
pub use retriever::Retriever;
pub use session::{Conversation, Role, Turn};
