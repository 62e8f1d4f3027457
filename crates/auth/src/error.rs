//! Authentication errors

use thiserror::Error;

/// Authentication error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session for the chat; stateful commands short-circuit on this
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Already authenticated")]
    AlreadyAuthenticated,

    /// Provider rejected the email/password pair (carries the provider's reason code)
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("EMAIL_EXISTS")]
    EmailExists,

    /// Provider refused the request for any other reason (weak password, malformed email, ...)
    #[error("{0}")]
    Rejected(String),

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Identity provider configuration error: {0}")]
    Configuration(String),
}
