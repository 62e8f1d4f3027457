//! Process-local conversation store

use std::collections::HashMap;

use tokio::sync::RwLock;
use walletbot_common::{ChatId, FlowSlot};

use super::ConversationStore;
use crate::domain::state::ConversationState;

/// No expiry: a pending flow lives until it completes, is cancelled,
/// is replaced, or the chat logs out.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    states: RwLock<HashMap<ChatId, ConversationState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FlowSlot for InMemoryConversationStore {
    async fn clear(&self, chat: ChatId) {
        if self.states.write().await.remove(&chat).is_some() {
            tracing::debug!(chat_id = %chat, "Pending flow cleared");
        }
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, chat: ChatId) -> Option<ConversationState> {
        self.states.read().await.get(&chat).cloned()
    }

    async fn set(&self, chat: ChatId, state: ConversationState) {
        tracing::debug!(chat_id = %chat, step = %state.step, "Flow step stored");
        self.states.write().await.insert(chat, state);
    }
}
