//! Chat identifiers and the per-chat flow slot
//!
//! Every piece of per-user state in Walletbot is keyed by the chat the
//! messages arrive on. `FlowSlot` is the narrow capability the session
//! store needs from the conversation store: wiping a pending flow on logout
//! without knowing what a flow looks like.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stable identifier of a user's ongoing dialogue with the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl ChatId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(ChatId)
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clearing capability over per-chat pending interactions.
///
/// Implemented by the conversation state store; held by the session store so
/// that logging out also drops whatever flow the chat was in the middle of.
#[async_trait::async_trait]
pub trait FlowSlot: Send + Sync {
    /// Remove the pending interaction for `chat`, if any
    async fn clear(&self, chat: ChatId);
}
