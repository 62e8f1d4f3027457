//! Concrete authentication backend
//!
//! Wraps the identity provider and the session store. The conversation
//! engine commits login and signup through it, the command layer gates
//! stateful commands on `require_session`.

use std::sync::Arc;

use walletbot_common::ChatId;

use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::session::SessionStore;
use crate::types::{Identity, Session};

#[derive(Clone)]
pub struct AuthBackend {
    provider: Arc<dyn IdentityProvider>,
    sessions: SessionStore,
}

impl AuthBackend {
    pub fn new(provider: Arc<dyn IdentityProvider>, sessions: SessionStore) -> Self {
        Self { provider, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.provider.sign_in(email, password).await.map_err(|e| {
            tracing::warn!(error = %e, "Sign-in failed");
            e
        })
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        surname: &str,
    ) -> Result<Identity, AuthError> {
        let identity = self
            .provider
            .sign_up(email, password, name, surname)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Sign-up failed");
                e
            })?;

        tracing::info!(subject_id = %identity.subject_id, "Account created");
        Ok(identity)
    }

    /// Session for `chat`, or `NotAuthenticated` when the chat is logged out.
    pub async fn require_session(&self, chat: ChatId) -> Result<Session, AuthError> {
        self.sessions
            .get(chat)
            .await
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Fails with `AlreadyAuthenticated` when the chat already has a session.
    pub async fn require_anonymous(&self, chat: ChatId) -> Result<(), AuthError> {
        if self.sessions.is_authenticated(chat).await {
            return Err(AuthError::AlreadyAuthenticated);
        }
        Ok(())
    }
}
