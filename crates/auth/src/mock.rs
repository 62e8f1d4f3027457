//! Mock Identity Provider Implementation
//!
//! Keeps accounts in memory and records every call for test assertions.
//! Thread-safe via `Arc<Mutex<>>`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::types::Identity;

#[derive(Debug, Clone)]
struct MockAccount {
    password: String,
    identity: Identity,
}

#[derive(Debug, Default)]
struct MockState {
    accounts: HashMap<String, MockAccount>,
    calls: Vec<IdentityCall>,
    next_id: u64,
    unavailable: bool,
}

/// A call made against the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    SignIn { email: String },
    SignUp { email: String, name: String, surname: String },
}

/// In-memory identity provider with deterministic subject ids (`mock-uid-1`, `mock-uid-2`, ...)
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account that can sign in immediately.
    pub fn with_account(
        self,
        email: &str,
        password: &str,
        name: &str,
        surname: &str,
    ) -> Self {
        {
            let mut state = self.state.lock().expect("mock lock poisoned by a prior panic");
            let identity = Self::new_identity(&mut state, email, name, surname);
            state.accounts.insert(
                email.to_string(),
                MockAccount {
                    password: password.to_string(),
                    identity,
                },
            );
        }
        self
    }

    /// Make every following call fail as if the provider were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state
            .lock()
            .expect("mock lock poisoned by a prior panic")
            .unavailable = unavailable;
    }

    /// Return all recorded calls.
    pub fn recorded_calls(&self) -> Vec<IdentityCall> {
        self.state
            .lock()
            .expect("mock lock poisoned by a prior panic")
            .calls
            .clone()
    }

    /// Clear recorded calls (accounts are kept).
    pub fn reset(&self) {
        self.state
            .lock()
            .expect("mock lock poisoned by a prior panic")
            .calls
            .clear();
    }

    fn new_identity(state: &mut MockState, email: &str, name: &str, surname: &str) -> Identity {
        state.next_id += 1;
        Identity {
            subject_id: format!("mock-uid-{}", state.next_id),
            email: email.to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        tracing::debug!("Mock identity provider: sign in");
        let mut state = self
            .state
            .lock()
            .map_err(|e| AuthError::Provider(format!("mock lock poisoned: {e}")))?;

        state.calls.push(IdentityCall::SignIn {
            email: email.to_string(),
        });

        if state.unavailable {
            return Err(AuthError::Provider("mock provider unavailable".to_string()));
        }

        match state.accounts.get(email) {
            Some(account) if account.password == password => Ok(account.identity.clone()),
            Some(_) => Err(AuthError::InvalidCredentials("INVALID_PASSWORD".to_string())),
            None => Err(AuthError::InvalidCredentials("EMAIL_NOT_FOUND".to_string())),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        surname: &str,
    ) -> Result<Identity, AuthError> {
        tracing::debug!("Mock identity provider: sign up");
        let mut state = self
            .state
            .lock()
            .map_err(|e| AuthError::Provider(format!("mock lock poisoned: {e}")))?;

        state.calls.push(IdentityCall::SignUp {
            email: email.to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
        });

        if state.unavailable {
            return Err(AuthError::Provider("mock provider unavailable".to_string()));
        }
        if state.accounts.contains_key(email) {
            return Err(AuthError::EmailExists);
        }
        if password.chars().count() < 6 {
            return Err(AuthError::Rejected(
                "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
            ));
        }

        let identity = Self::new_identity(&mut state, email, name, surname);
        state.accounts.insert(
            email.to_string(),
            MockAccount {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        Ok(identity)
    }
}
