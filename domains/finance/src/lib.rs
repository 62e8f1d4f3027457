//! Finance domain: cards, transactions, limits, plans, wishes

pub mod domain;
pub mod error;
pub mod reports;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    mask_card_number, Card, MonthlyTarget, NewTransaction, Transaction, TransactionKind, Wish,
    COST_CATEGORIES, INCOME_CATEGORIES,
};
pub use domain::money::{
    format_amount, format_money, saturating_sum, AMOUNT_SCALE, MAX_WHOLE_AMOUNT,
};
pub use error::CommitError;
pub use repository::{today, FinanceRepository, InMemoryFinanceRepository, PgFinanceRepository};
