//! Repository implementations for Finance domain

pub mod memory;
pub mod postgres;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::entities::{Card, NewTransaction, Transaction};
use crate::error::CommitError;

pub use memory::InMemoryFinanceRepository;
pub use postgres::PgFinanceRepository;

/// Persistence collaborator for cards and transactions.
///
/// Writes are single-shot: no retry and no idempotency key.
#[async_trait::async_trait]
pub trait FinanceRepository: Send + Sync {
    /// Cards owned by `user_id`, oldest first
    async fn user_cards(&self, user_id: &str) -> Result<Vec<Card>, CommitError>;

    async fn card_by_id(&self, card_id: Uuid) -> Result<Option<Card>, CommitError>;

    /// Create a card with empty limit, plan and wish lists
    async fn add_card(
        &self,
        user_id: &str,
        card_number: &str,
        amount: Decimal,
    ) -> Result<Card, CommitError>;

    /// Store a transaction; applied ones move the owning card's balance
    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction, CommitError>;

    /// Upsert the card's limit for `month`
    async fn add_card_limit(
        &self,
        card_id: Uuid,
        month: &str,
        amount: Decimal,
    ) -> Result<(), CommitError>;

    /// Upsert the card's plan for `month`
    async fn add_card_plan(
        &self,
        card_id: Uuid,
        month: &str,
        amount: Decimal,
    ) -> Result<(), CommitError>;

    /// Append a wish to the card
    async fn add_card_wish(
        &self,
        card_id: Uuid,
        name: &str,
        target_amount: Decimal,
    ) -> Result<(), CommitError>;

    /// All transactions of a card, newest date first
    async fn card_transactions(&self, card_id: Uuid) -> Result<Vec<Transaction>, CommitError>;

    /// Future-dated transactions of a card, earliest date first
    async fn scheduled_transactions(&self, card_id: Uuid)
        -> Result<Vec<Transaction>, CommitError>;

    /// Applied transactions of a card, newest date first
    async fn current_transactions(&self, card_id: Uuid) -> Result<Vec<Transaction>, CommitError>;

    /// Transactions of a card dated within `[start, end]`, newest date first
    async fn transactions_by_period(
        &self,
        card_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, CommitError>;

    /// Transactions across every card of `user_id`, newest date first
    async fn user_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, CommitError>;
}

/// Today's date as used to decide whether a transaction is scheduled
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
