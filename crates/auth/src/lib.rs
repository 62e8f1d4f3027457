//! Sessions and identity for Walletbot
//!
//! Provides the per-chat session store (which also drops pending flows on
//! logout), the identity provider seam with Firebase and mock
//! implementations, and `AuthBackend` tying the two together.

mod backend;
mod config;
mod error;
mod firebase;
mod mock;
mod provider;
mod session;
mod types;

pub use backend::AuthBackend;
pub use config::{AuthConfig, DEFAULT_FIREBASE_BASE_URL};
pub use error::AuthError;
pub use firebase::FirebaseIdentityProvider;
pub use mock::{IdentityCall, MockIdentityProvider};
pub use provider::{IdentityProvider, IdentityProviderFactory};
pub use session::{InMemorySessionBackend, SessionBackend, SessionStore};
pub use types::{Identity, Session};
