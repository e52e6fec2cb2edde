//! Per-conversation state storage for the dialogue.

use courier_types::conversation::{ConversationId, ConversationState};
use dashmap::DashMap;

/// Pluggable storage of conversation states.
///
/// A conversation with no stored state is `Idle`.
pub trait SessionStore: Send + Sync {
    fn state(&self, id: ConversationId) -> ConversationState;

    fn set_state(&self, id: ConversationId, state: ConversationState);

    /// Forget the conversation (back to `Idle`).
    fn clear(&self, id: ConversationId);
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    states: DashMap<ConversationId, ConversationState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn state(&self, id: ConversationId) -> ConversationState {
        self.states.get(&id).map(|s| *s).unwrap_or_default()
    }

    fn set_state(&self, id: ConversationId, state: ConversationState) {
        if state == ConversationState::Idle {
            self.states.remove(&id);
        } else {
            self.states.insert(id, state);
        }
    }

    fn clear(&self, id: ConversationId) {
        self.states.remove(&id);
    }
}
