//! Per-chat session store
//!
//! A session exists for a chat exactly when that chat is authenticated.
//! Storage is behind `SessionBackend` so a shared cache can replace the
//! in-memory map without touching callers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use walletbot_common::{ChatId, FlowSlot};

use crate::types::{Identity, Session};

/// Storage for sessions keyed by chat
#[async_trait::async_trait]
pub trait SessionBackend: Send + Sync {
    async fn get(&self, chat: ChatId) -> Option<Session>;
    async fn set(&self, chat: ChatId, session: Session);
    async fn clear(&self, chat: ChatId);
}

/// Process-local session storage
#[derive(Debug, Default)]
pub struct InMemorySessionBackend {
    sessions: RwLock<HashMap<ChatId, Session>>,
}

impl InMemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionBackend for InMemorySessionBackend {
    async fn get(&self, chat: ChatId) -> Option<Session> {
        self.sessions.read().await.get(&chat).cloned()
    }

    async fn set(&self, chat: ChatId, session: Session) {
        self.sessions.write().await.insert(chat, session);
    }

    async fn clear(&self, chat: ChatId) {
        self.sessions.write().await.remove(&chat);
    }
}

/// Session store that also owns the logout side effect on pending flows.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    flows: Arc<dyn FlowSlot>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>, flows: Arc<dyn FlowSlot>) -> Self {
        Self { backend, flows }
    }

    /// In-memory store, the default for a single-process deployment
    pub fn in_memory(flows: Arc<dyn FlowSlot>) -> Self {
        Self::new(Arc::new(InMemorySessionBackend::new()), flows)
    }

    pub async fn get(&self, chat: ChatId) -> Option<Session> {
        self.backend.get(chat).await
    }

    /// Bind `identity` to `chat`, replacing any existing session outright.
    pub async fn set(&self, chat: ChatId, identity: Identity) -> Session {
        let session = Session::from_identity(identity);
        tracing::info!(chat_id = %chat, subject_id = %session.subject_id, "Session established");
        self.backend.set(chat, session.clone()).await;
        session
    }

    /// Log the chat out. Any pending conversation for the chat is dropped too.
    pub async fn clear(&self, chat: ChatId) {
        self.backend.clear(chat).await;
        self.flows.clear(chat).await;
        tracing::info!(chat_id = %chat, "Session cleared");
    }

    pub async fn is_authenticated(&self, chat: ChatId) -> bool {
        self.backend.get(chat).await.is_some()
    }
}
