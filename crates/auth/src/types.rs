//! Identity and session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account as reported by the identity provider after sign-in or sign-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    pub email: String,
    pub name: String,
    pub surname: String,
}

impl Identity {
    /// Build an identity from the provider's single display-name field.
    ///
    /// The name is everything before the first space, the surname everything after.
    pub fn from_display_name(
        subject_id: impl Into<String>,
        email: impl Into<String>,
        display_name: Option<&str>,
    ) -> Self {
        let (name, surname) = split_display_name(display_name.unwrap_or_default());
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
            name,
            surname,
        }
    }

    /// `"<name> <surname>"`, trimmed when either half is empty
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

fn split_display_name(display_name: &str) -> (String, String) {
    let trimmed = display_name.trim();
    match trimmed.split_once(' ') {
        Some((name, surname)) => (name.to_string(), surname.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Authenticated binding between a chat and a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub surname: String,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn from_identity(identity: Identity) -> Self {
        Self {
            subject_id: identity.subject_id,
            email: identity.email,
            display_name: identity.name,
            surname: identity.surname,
            established_at: Utc::now(),
        }
    }

    /// Name used in greetings, falling back to "User"
    pub fn greeting_name(&self) -> &str {
        if self.display_name.is_empty() {
            "User"
        } else {
            &self.display_name
        }
    }
}
