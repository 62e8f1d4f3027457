//! PostgreSQL finance repository
//!
//! Runtime `sqlx::query_as` (not macros) so the workspace builds without a
//! live database. Limits, plans and wishes are embedded in the card row as
//! JSONB and rewritten with a read-modify-write under `FOR UPDATE`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction as PgTransaction};
use uuid::Uuid;

use super::{today, FinanceRepository};
use crate::domain::entities::{Card, MonthlyTarget, NewTransaction, Transaction, Wish};
use crate::error::CommitError;

/// Row type for card lookups
#[derive(sqlx::FromRow)]
struct CardRow {
    id: Uuid,
    user_id: String,
    card_number: String,
    current_amount: Decimal,
    limits: Json<Vec<MonthlyTarget>>,
    plans: Json<Vec<MonthlyTarget>>,
    wishes: Json<Vec<Wish>>,
    created_at: DateTime<Utc>,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Card {
            id: row.id,
            user_id: row.user_id,
            card_number: row.card_number,
            current_amount: row.current_amount,
            limits: row.limits.0,
            plans: row.plans.0,
            wishes: row.wishes.0,
            created_at: row.created_at,
        }
    }
}

const CARD_COLUMNS: &str =
    "id, user_id, card_number, current_amount, limits, plans, wishes, created_at";

const TRANSACTION_COLUMNS: &str = "id, card_id, title, kind, category, amount, date, \
     scheduled, is_affect, include_in_expected, created_at";

#[derive(Clone)]
pub struct PgFinanceRepository {
    pool: PgPool,
}

impl PgFinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations from `migrations/`
    pub async fn migrate(&self) -> Result<(), CommitError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CommitError::Unavailable(format!("migration failed: {}", e)))
    }

    async fn lock_card(
        transaction: &mut PgTransaction<'_, Postgres>,
        card_id: Uuid,
    ) -> Result<Card, CommitError> {
        let row: Option<CardRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cards WHERE id = $1 FOR UPDATE",
            CARD_COLUMNS
        ))
        .bind(card_id)
        .fetch_optional(&mut **transaction)
        .await?;

        row.map(Card::from).ok_or(CommitError::CardNotFound)
    }

    /// Read-modify-write of a card's embedded lists inside one transaction
    async fn update_embedded<F>(&self, card_id: Uuid, update: F) -> Result<(), CommitError>
    where
        F: FnOnce(&mut Card) + Send,
    {
        let mut transaction = self.pool.begin().await?;
        let mut card = Self::lock_card(&mut transaction, card_id).await?;

        update(&mut card);

        sqlx::query("UPDATE cards SET limits = $2, plans = $3, wishes = $4 WHERE id = $1")
            .bind(card_id)
            .bind(Json(&card.limits))
            .bind(Json(&card.plans))
            .bind(Json(&card.wishes))
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;
        Ok(())
    }

    async fn fetch_transactions(
        &self,
        filter: &str,
        order: &str,
        card_id: Uuid,
    ) -> Result<Vec<Transaction>, CommitError> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions WHERE card_id = $1 {} ORDER BY {}",
            TRANSACTION_COLUMNS, filter, order
        ))
        .bind(card_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}

const NEWEST_FIRST: &str = "date DESC, created_at DESC";
const OLDEST_FIRST: &str = "date ASC, created_at ASC";

#[async_trait::async_trait]
impl FinanceRepository for PgFinanceRepository {
    async fn user_cards(&self, user_id: &str) -> Result<Vec<Card>, CommitError> {
        let rows: Vec<CardRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cards WHERE user_id = $1 ORDER BY created_at ASC",
            CARD_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to load cards");
            CommitError::from(e)
        })?;

        Ok(rows.into_iter().map(Card::from).collect())
    }

    async fn card_by_id(&self, card_id: Uuid) -> Result<Option<Card>, CommitError> {
        let row: Option<CardRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cards WHERE id = $1",
            CARD_COLUMNS
        ))
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Card::from))
    }

    async fn add_card(
        &self,
        user_id: &str,
        card_number: &str,
        amount: Decimal,
    ) -> Result<Card, CommitError> {
        let card = Card::new(user_id, card_number, amount);

        let row: CardRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO cards (
                id, user_id, card_number, current_amount, limits, plans, wishes, created_at
            )
            VALUES ($1, $2, $3, $4, '[]'::jsonb, '[]'::jsonb, '[]'::jsonb, $5)
            RETURNING {}
            "#,
            CARD_COLUMNS
        ))
        .bind(card.id)
        .bind(&card.user_id)
        .bind(&card.card_number)
        .bind(card.current_amount)
        .bind(card.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to insert card");
            CommitError::from(e)
        })?;

        Ok(row.into())
    }

    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction, CommitError> {
        let tx = Transaction::record(new, today());
        let mut transaction = self.pool.begin().await?;

        let card = Self::lock_card(&mut transaction, tx.card_id).await?;
        let balance = card.balance_after(tx.balance_delta())?;

        let stored = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (
                id, card_id, title, kind, category, amount, date,
                scheduled, is_affect, include_in_expected, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(tx.id)
        .bind(tx.card_id)
        .bind(&tx.title)
        .bind(tx.kind)
        .bind(&tx.category)
        .bind(tx.amount)
        .bind(tx.date)
        .bind(tx.scheduled)
        .bind(tx.is_affect)
        .bind(tx.include_in_expected)
        .bind(tx.created_at)
        .fetch_one(&mut *transaction)
        .await?;

        if stored.is_affect {
            sqlx::query("UPDATE cards SET current_amount = $2 WHERE id = $1")
                .bind(stored.card_id)
                .bind(balance)
                .execute(&mut *transaction)
                .await?;
        }

        transaction.commit().await?;

        tracing::info!(
            card_id = %stored.card_id,
            transaction_id = %stored.id,
            scheduled = stored.scheduled,
            "Transaction stored"
        );
        Ok(stored)
    }

    async fn add_card_limit(
        &self,
        card_id: Uuid,
        month: &str,
        amount: Decimal,
    ) -> Result<(), CommitError> {
        self.update_embedded(card_id, |card| card.set_limit(month, amount))
            .await
    }

    async fn add_card_plan(
        &self,
        card_id: Uuid,
        month: &str,
        amount: Decimal,
    ) -> Result<(), CommitError> {
        self.update_embedded(card_id, |card| card.set_plan(month, amount))
            .await
    }

    async fn add_card_wish(
        &self,
        card_id: Uuid,
        name: &str,
        target_amount: Decimal,
    ) -> Result<(), CommitError> {
        self.update_embedded(card_id, |card| card.add_wish(name, target_amount))
            .await
    }

    async fn card_transactions(&self, card_id: Uuid) -> Result<Vec<Transaction>, CommitError> {
        self.fetch_transactions("", NEWEST_FIRST, card_id).await
    }

    async fn scheduled_transactions(
        &self,
        card_id: Uuid,
    ) -> Result<Vec<Transaction>, CommitError> {
        self.fetch_transactions("AND scheduled = TRUE", OLDEST_FIRST, card_id)
            .await
    }

    async fn current_transactions(&self, card_id: Uuid) -> Result<Vec<Transaction>, CommitError> {
        self.fetch_transactions("AND is_affect = TRUE", NEWEST_FIRST, card_id)
            .await
    }

    async fn transactions_by_period(
        &self,
        card_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, CommitError> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions \
             WHERE card_id = $1 AND date BETWEEN $2 AND $3 ORDER BY {}",
            TRANSACTION_COLUMNS, NEWEST_FIRST
        ))
        .bind(card_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn user_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, CommitError> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE card_id IN (SELECT id FROM cards WHERE user_id = $1)
            ORDER BY {}
            "#,
            TRANSACTION_COLUMNS, NEWEST_FIRST
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
