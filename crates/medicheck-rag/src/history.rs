//! Per-conversation message history.

use medicheck_llm::{Message, Role};

pub type ConversationTurn = Message;

/// Append-only list of user and assistant turns for one conversation.
///
/// The system persona is not stored here; it is prepended on every call.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// At most `max_turns` of the most recent turns, oldest first, starting
    /// on a user turn. `None` means all.
    pub fn window(&self, max_turns: Option<usize>) -> &[ConversationTurn] {
        let start = match max_turns {
            Some(n) if n < self.turns.len() => self.turns.len() - n,
            _ => return &self.turns,
        };
        let tail = &self.turns[start..];
        match tail.iter().position(|t| t.role == Role::User) {
            Some(offset) => &tail[offset..],
            None => tail,
        }
    }
}
