//! In-memory finance repository
//!
//! Backs local runs and tests. Writes can be switched to fail so callers
//! can exercise their commit-failure paths.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{today, FinanceRepository};
use crate::domain::entities::{Card, NewTransaction, Transaction};
use crate::error::CommitError;

#[derive(Debug, Default)]
struct Ledger {
    cards: Vec<Card>,
    transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
pub struct InMemoryFinanceRepository {
    ledger: RwLock<Ledger>,
    fail_writes: AtomicBool,
}

impl InMemoryFinanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail with `CommitError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), CommitError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CommitError::Unavailable(
                "writes disabled on in-memory repository".to_string(),
            ));
        }
        Ok(())
    }

    async fn update_card<F>(&self, card_id: Uuid, update: F) -> Result<(), CommitError>
    where
        F: FnOnce(&mut Card) + Send,
    {
        self.check_writable()?;
        let mut ledger = self.ledger.write().await;
        let card = ledger
            .cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or(CommitError::CardNotFound)?;
        update(card);
        Ok(())
    }

    async fn select<P>(&self, predicate: P, newest_first: bool) -> Vec<Transaction>
    where
        P: Fn(&Transaction) -> bool + Send,
    {
        let ledger = self.ledger.read().await;
        let mut selected: Vec<Transaction> = ledger
            .transactions
            .iter()
            .filter(|tx| predicate(tx))
            .cloned()
            .collect();
        if newest_first {
            selected.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        } else {
            selected.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        }
        selected
    }
}

#[async_trait::async_trait]
impl FinanceRepository for InMemoryFinanceRepository {
    async fn user_cards(&self, user_id: &str) -> Result<Vec<Card>, CommitError> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .cards
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn card_by_id(&self, card_id: Uuid) -> Result<Option<Card>, CommitError> {
        let ledger = self.ledger.read().await;
        Ok(ledger.cards.iter().find(|c| c.id == card_id).cloned())
    }

    async fn add_card(
        &self,
        user_id: &str,
        card_number: &str,
        amount: Decimal,
    ) -> Result<Card, CommitError> {
        self.check_writable()?;
        let card = Card::new(user_id, card_number, amount);
        self.ledger.write().await.cards.push(card.clone());
        tracing::debug!(card_id = %card.id, "Card stored in memory");
        Ok(card)
    }

    async fn add_transaction(&self, new: NewTransaction) -> Result<Transaction, CommitError> {
        self.check_writable()?;
        let mut ledger = self.ledger.write().await;

        let tx = Transaction::record(new, today());
        let card = ledger
            .cards
            .iter_mut()
            .find(|c| c.id == tx.card_id)
            .ok_or(CommitError::CardNotFound)?;
        card.current_amount = card.balance_after(tx.balance_delta())?;
        ledger.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn add_card_limit(
        &self,
        card_id: Uuid,
        month: &str,
        amount: Decimal,
    ) -> Result<(), CommitError> {
        self.update_card(card_id, |card| card.set_limit(month, amount))
            .await
    }

    async fn add_card_plan(
        &self,
        card_id: Uuid,
        month: &str,
        amount: Decimal,
    ) -> Result<(), CommitError> {
        self.update_card(card_id, |card| card.set_plan(month, amount))
            .await
    }

    async fn add_card_wish(
        &self,
        card_id: Uuid,
        name: &str,
        target_amount: Decimal,
    ) -> Result<(), CommitError> {
        self.update_card(card_id, |card| card.add_wish(name, target_amount))
            .await
    }

    async fn card_transactions(&self, card_id: Uuid) -> Result<Vec<Transaction>, CommitError> {
        Ok(self.select(|tx| tx.card_id == card_id, true).await)
    }

    async fn scheduled_transactions(
        &self,
        card_id: Uuid,
    ) -> Result<Vec<Transaction>, CommitError> {
        Ok(self
            .select(|tx| tx.card_id == card_id && tx.scheduled, false)
            .await)
    }

    async fn current_transactions(&self, card_id: Uuid) -> Result<Vec<Transaction>, CommitError> {
        Ok(self
            .select(|tx| tx.card_id == card_id && tx.is_affect, true)
            .await)
    }

    async fn transactions_by_period(
        &self,
        card_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, CommitError> {
        Ok(self
            .select(
                |tx| tx.card_id == card_id && tx.date >= start && tx.date <= end,
                true,
            )
            .await)
    }

    async fn user_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, CommitError> {
        let card_ids: Vec<Uuid> = self
            .user_cards(user_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        Ok(self.select(|tx| card_ids.contains(&tx.card_id), true).await)
    }
}
