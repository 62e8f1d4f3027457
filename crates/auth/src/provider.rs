//! Identity provider seam and factory

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::firebase::FirebaseIdentityProvider;
use crate::mock::MockIdentityProvider;
use crate::types::Identity;

/// Email/password account service
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and return the account they belong to
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Create an account carrying the given name and surname
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        surname: &str,
    ) -> Result<Identity, AuthError>;
}

/// Factory for creating IdentityProvider implementations.
pub struct IdentityProviderFactory;

impl IdentityProviderFactory {
    /// Create an IdentityProvider based on configuration.
    pub fn create(config: AuthConfig) -> Result<Arc<dyn IdentityProvider>, AuthError> {
        match config.provider.as_str() {
            "firebase" => {
                tracing::info!("Creating Firebase identity provider");
                Ok(Arc::new(FirebaseIdentityProvider::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock identity provider");
                Ok(Arc::new(MockIdentityProvider::new()))
            }
            provider => Err(AuthError::Configuration(format!(
                "Unknown identity provider: {}. Supported providers: firebase, mock",
                provider
            ))),
        }
    }
}
