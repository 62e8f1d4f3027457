//! Identity provider configuration

use crate::error::AuthError;

pub const DEFAULT_FIREBASE_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Identity provider configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Identity provider (firebase, mock)
    pub provider: String,
    /// Web API key of the Firebase project
    pub api_key: Option<String>,
    /// Identity Toolkit base URL, overridable for tests
    pub base_url: String,
}

impl std::fmt::Debug for AuthConfig {
    #[mutants::skip] // Debug formatting only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AuthConfig {
    /// Mock provider config, used by tests and local development
    pub fn mock() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: None,
            base_url: DEFAULT_FIREBASE_BASE_URL.to_string(),
        }
    }

    /// Create auth config from environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("IDENTITY_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let api_key = std::env::var("FIREBASE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let base_url = std::env::var("FIREBASE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_FIREBASE_BASE_URL.to_string());

        if provider == "firebase" && api_key.is_none() {
            return Err(AuthError::Configuration(
                "FIREBASE_API_KEY is required for Firebase provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            base_url,
        })
    }
}
