//! Context assembly for RAG prompts.

use super::session::{Conversation, Turn};
use crate::vector_store::SearchResult;

/// Separator between chunk texts in the assembled context.
const CHUNK_SEPARATOR: &str = "\n\n";

/// Join retrieved chunk texts into one context string.
///
/// Zero chunks produce an empty string; the generator's persona rules
/// handle the empty-context case downstream.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

/// Render turns as a "ROLE: content" transcript, one line per turn.
pub fn format_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.transcript_label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefix a question with the conversation history when prior turns exist.
///
/// The conversation is expected to already contain the current question as
/// its last turn; everything before it becomes the transcript.
pub fn question_with_history(conversation: &Conversation, question: &str) -> String {
    let history = conversation.turns_before_last();
    if history.is_empty() {
        return question.to_string();
    }

    format!(
        "Lịch sử cuộc trò chuyện:\n{}\n\nCâu hỏi hiện tại: {}",
        format_history(history),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::Chunk;

    fn result(content: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk::new("rules.txt".to_string(), content.to_string(), 0, vec![1.0]),
            score: 0.9,
        }
    }

    #[test]
    fn test_empty_results_empty_context() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn test_context_contains_all_chunks_separated() {
        let results = vec![result("điểm danh"), result("tính điểm"), result("vi phạm")];
        let context = format_context(&results);

        assert!(context.contains("điểm danh"));
        assert!(context.contains("tính điểm"));
        assert!(context.contains("vi phạm"));
        assert_eq!(context.matches(CHUNK_SEPARATOR).count(), 2);
    }

    #[test]
    fn test_history_transcript_format() {
        let turns = vec![Turn::user("FCAJ là gì?"), Turn::assistant("Một cộng đồng.")];
        assert_eq!(
            format_history(&turns),
            "USER: FCAJ là gì?\nASSISTANT: Một cộng đồng."
        );
    }

    #[test]
    fn test_first_question_has_no_history_prefix() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("FCAJ là gì?"));

        assert_eq!(
            question_with_history(&conversation, "FCAJ là gì?"),
            "FCAJ là gì?"
        );
    }

    #[test]
    fn test_followup_question_is_history_prefixed() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("FCAJ là gì?"));
        conversation.push(Turn::assistant("Một cộng đồng học AWS."));
        conversation.push(Turn::user("Ai sáng lập?"));

        let combined = question_with_history(&conversation, "Ai sáng lập?");
        assert!(combined.starts_with("Lịch sử cuộc trò chuyện:\n"));
        assert!(combined.contains("USER: FCAJ là gì?"));
        assert!(combined.contains("ASSISTANT: Một cộng đồng học AWS."));
        assert!(combined.ends_with("Câu hỏi hiện tại: Ai sáng lập?"));
        // The pending question itself is not part of the transcript.
        assert!(!combined.contains("USER: Ai sáng lập?"));
    }
}
