//! Conversation session state.
//!
//! An explicit, session-scoped object passed by reference through the
//! request path: created empty on the first request, grown by append,
//! cleared entirely on explicit user reset.

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering a conversation transcript.
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered, append-only sequence of turns for one session.
///
/// Role alternation is expected but not enforced here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Remove all turns (full reset).
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// All turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns preceding the most recent one (the conversation history seen
    /// from a just-appended question).
    pub fn turns_before_last(&self) -> &[Turn] {
        match self.turns.len() {
            0 => &[],
            n => &self.turns[..n - 1],
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("FCAJ là gì?"));
        conversation.push(Turn::assistant("Một cộng đồng học AWS."));
        conversation.push(Turn::user("Ai sáng lập?"));

        let turns = conversation.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[2].content, "Ai sáng lập?");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("câu hỏi"));
        conversation.push(Turn::assistant("trả lời"));

        conversation.clear();
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_turns_before_last() {
        let mut conversation = Conversation::new();
        assert!(conversation.turns_before_last().is_empty());

        conversation.push(Turn::user("một"));
        assert!(conversation.turns_before_last().is_empty());

        conversation.push(Turn::assistant("hai"));
        conversation.push(Turn::user("ba"));
        let history = conversation.turns_before_last();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "hai");
    }
}
