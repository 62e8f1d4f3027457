//! Conversation state storage

pub mod memory;

use walletbot_common::{ChatId, FlowSlot};

use crate::domain::state::ConversationState;

pub use memory::InMemoryConversationStore;

/// At most one pending flow per chat.
///
/// `set` overwrites unconditionally: it both starts and advances flows, and
/// starting a flow silently abandons whatever was pending. Clearing comes
/// from `FlowSlot`, which the session store also holds for logout.
#[async_trait::async_trait]
pub trait ConversationStore: FlowSlot {
    async fn get(&self, chat: ChatId) -> Option<ConversationState>;

    async fn set(&self, chat: ChatId, state: ConversationState);
}
