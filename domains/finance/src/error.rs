//! Persistence errors for the Finance domain

use thiserror::Error;

/// Failure of a persistence call. At a flow's terminal step this is
/// reported to the user and the flow is discarded; nothing retries.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Card not found")]
    CardNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
