//! Firebase Identity Toolkit implementation
//!
//! Calls the REST endpoints `accounts:signInWithPassword`, `accounts:signUp`
//! and `accounts:update` using reqwest. Name and surname travel in the
//! account's `displayName`.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::provider::IdentityProvider;
use crate::types::Identity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

/// Identity Toolkit error envelope
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Firebase email/password identity provider
pub struct FirebaseIdentityProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentityProvider {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let api_key = config.api_key.ok_or_else(|| {
            AuthError::Configuration("FIREBASE_API_KEY is required for Firebase provider".into())
        })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<AccountResponse, AuthError> {
        let url = format!("{}/v1/accounts:{}", self.base_url, endpoint);

        tracing::debug!(endpoint = %endpoint, "Sending Identity Toolkit request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(classify(&error_response.error.message));
            }

            return Err(AuthError::Provider(format!(
                "Identity Toolkit returned {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Failed to parse response: {}", e)))
    }
}

/// Map an Identity Toolkit error message to an `AuthError`.
///
/// Messages look like `INVALID_PASSWORD` or `WEAK_PASSWORD : Password should be ...`.
fn classify(message: &str) -> AuthError {
    let code = message.split(':').next().unwrap_or(message).trim();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED"
        | "INVALID_EMAIL" => AuthError::InvalidCredentials(code.to_string()),
        "EMAIL_EXISTS" => AuthError::EmailExists,
        _ => AuthError::Rejected(message.to_string()),
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let account = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        Ok(Identity::from_display_name(
            account.local_id,
            account.email,
            account.display_name.as_deref(),
        ))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        surname: &str,
    ) -> Result<Identity, AuthError> {
        let account = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let identity = Identity {
            subject_id: account.local_id,
            email: account.email,
            name: name.to_string(),
            surname: surname.to_string(),
        };

        // Profile write is best-effort; the account already exists
        match account.id_token.as_deref() {
            Some(id_token) => {
                let display_name = identity.display_name();
                if let Err(e) = self
                    .call(
                        "update",
                        &UpdateProfileRequest {
                            id_token,
                            display_name: &display_name,
                            return_secure_token: false,
                        },
                    )
                    .await
                {
                    tracing::warn!(
                        error = %e,
                        subject_id = %identity.subject_id,
                        "Failed to store display name"
                    );
                }
            }
            None => {
                tracing::warn!(
                    subject_id = %identity.subject_id,
                    "Sign-up response carried no id token"
                );
            }
        }

        Ok(identity)
    }
}
