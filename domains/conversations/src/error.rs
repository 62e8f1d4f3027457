//! Errors raised while entering or finishing a flow

use thiserror::Error;
use walletbot_auth::AuthError;
use walletbot_finance::CommitError;

use crate::domain::state::Field;

/// A flow could not be entered; no state was created
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("No cards to select from")]
    NoCards,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] CommitError),
}

/// A terminal step's side effect failed. Reported to the user; the flow is
/// discarded either way.
#[derive(Error, Debug)]
pub enum FlowCommitError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] CommitError),

    #[error("Missing {0:?}")]
    MissingField(Field),

    #[error("Malformed {field:?}: {value}")]
    Malformed { field: Field, value: String },
}
