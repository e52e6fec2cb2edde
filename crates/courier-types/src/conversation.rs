//! Conversation state for the bot front end.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a conversation (the chat platform's chat id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a conversation is in the add-message flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    /// The user pressed "add message"; the next text is the message body.
    AwaitingMessageText,
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationState::Idle => write!(f, "idle"),
            ConversationState::AwaitingMessageText => write!(f, "awaiting_message_text"),
        }
    }
}
