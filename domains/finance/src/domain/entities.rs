//! Domain entities for the Finance domain
//!
//! Cards own their limits, plans and wishes as embedded lists. Transactions
//! live separately and reference their card.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CommitError;

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Cost,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Cost => "cost",
            TransactionKind::Income => "income",
        }
    }

    /// Categories offered for this kind, in display order
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            TransactionKind::Cost => &COST_CATEGORIES,
            TransactionKind::Income => &INCOME_CATEGORIES,
        }
    }

    /// Signed effect of `amount` on a card balance
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Cost => -amount,
            TransactionKind::Income => amount,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TransactionKind::Cost => "🔴",
            TransactionKind::Income => "🟢",
        }
    }

    pub fn sign(&self) -> &'static str {
        match self {
            TransactionKind::Cost => "-",
            TransactionKind::Income => "+",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost" => Ok(TransactionKind::Cost),
            "income" => Ok(TransactionKind::Income),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

pub const COST_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Shopping",
    "Entertainment",
    "Bills",
    "Other",
];

pub const INCOME_CATEGORIES: [&str; 4] = ["Salary", "Gift", "Refund", "Other"];

/// A per-month amount attached to a card. Used for both spending limits
/// and minimum-balance plans; unique per month within its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTarget {
    /// `YYYY-MM`
    pub month: String,
    pub amount: Decimal,
}

/// Savings goal measured against the card balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    pub name: String,
    pub target_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Bank card entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub user_id: String,
    pub card_number: String,
    pub current_amount: Decimal,
    pub limits: Vec<MonthlyTarget>,
    pub plans: Vec<MonthlyTarget>,
    pub wishes: Vec<Wish>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Create a new card with empty limit, plan and wish lists
    pub fn new(
        user_id: impl Into<String>,
        card_number: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Card {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            card_number: card_number.into(),
            current_amount: amount,
            limits: Vec::new(),
            plans: Vec::new(),
            wishes: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// `**** 1234`
    pub fn masked_number(&self) -> String {
        mask_card_number(&self.card_number)
    }

    pub fn limit_for(&self, month: &str) -> Option<&MonthlyTarget> {
        self.limits.iter().find(|l| l.month == month)
    }

    /// Insert or replace the limit for `month`
    pub fn set_limit(&mut self, month: &str, amount: Decimal) {
        upsert_by_month(&mut self.limits, month, amount);
    }

    /// Insert or replace the plan for `month`
    pub fn set_plan(&mut self, month: &str, amount: Decimal) {
        upsert_by_month(&mut self.plans, month, amount);
    }

    /// Balance after applying `delta`; refuses results beyond `Decimal`'s range
    pub fn balance_after(&self, delta: Decimal) -> Result<Decimal, CommitError> {
        self.current_amount.checked_add(delta).ok_or_else(|| {
            CommitError::InvalidData(format!(
                "balance of card {} would overflow",
                self.masked_number()
            ))
        })
    }

    /// Wishes are append-only; duplicate names are kept
    pub fn add_wish(&mut self, name: &str, target_amount: Decimal) {
        self.wishes.push(Wish {
            name: name.to_string(),
            target_amount,
            created_at: Utc::now(),
        });
    }
}

fn upsert_by_month(targets: &mut Vec<MonthlyTarget>, month: &str, amount: Decimal) {
    match targets.iter_mut().find(|t| t.month == month) {
        Some(existing) => existing.amount = amount,
        None => targets.push(MonthlyTarget {
            month: month.to_string(),
            amount,
        }),
    }
}

/// Last four characters behind a mask
pub fn mask_card_number(card_number: &str) -> String {
    let chars: Vec<char> = card_number.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("**** {}", tail)
}

/// Transaction as collected from the user, before persistence decides
/// whether it is applied or scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub card_id: Uuid,
    pub title: String,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Transaction entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub card_id: Uuid,
    pub title: String,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Dated after the day it was recorded
    pub scheduled: bool,
    /// Counted in the card balance
    pub is_affect: bool,
    pub include_in_expected: bool,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Record `new` as of `today`. Future-dated transactions are scheduled
    /// and do not touch the balance.
    pub fn record(new: NewTransaction, today: NaiveDate) -> Self {
        let scheduled = new.date > today;
        Transaction {
            id: Uuid::new_v4(),
            card_id: new.card_id,
            title: new.title,
            kind: new.kind,
            category: new.category,
            amount: new.amount,
            date: new.date,
            scheduled,
            is_affect: !scheduled,
            include_in_expected: true,
            created_at: Utc::now(),
        }
    }

    /// Balance delta this transaction applies, zero when scheduled
    pub fn balance_delta(&self) -> Decimal {
        if self.is_affect {
            self.kind.signed(self.amount)
        } else {
            Decimal::ZERO
        }
    }
}
