//! PostgreSQL finance repository against a live database
//!
//! Reads `TEST_DATABASE_URL` (or `DATABASE_URL`, also from `.env.test` and
//! `.env`). Tests return early when neither is set. Every test works on
//! cards of a fresh user id, so no cleanup between tests is needed.

use std::env;
use std::sync::Once;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;
use walletbot_finance::{
    today, CommitError, FinanceRepository, NewTransaction, PgFinanceRepository, TransactionKind,
};

static INIT: Once = Once::new();

fn database_url() -> Option<String> {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test").ok();
        dotenvy::dotenv().ok();
    });

    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok()
}

/// Migrated repository, or `None` without a configured database
async fn repository() -> Result<Option<PgFinanceRepository>> {
    let Some(url) = database_url() else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL test");
        return Ok(None);
    };

    let pool = sqlx::PgPool::connect(&url).await?;
    let repository = PgFinanceRepository::new(pool);
    repository.migrate().await?;
    Ok(Some(repository))
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn user() -> String {
    format!("pg-test-{}", Uuid::new_v4())
}

fn transaction(
    card_id: Uuid,
    kind: TransactionKind,
    amount: &str,
    date: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        card_id,
        title: "Groceries".to_string(),
        kind,
        category: match kind {
            TransactionKind::Cost => "Food".to_string(),
            TransactionKind::Income => "Salary".to_string(),
        },
        amount: dec(amount),
        date,
    }
}

#[tokio::test]
async fn test_cards_are_listed_per_user() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };
    let owner = user();

    let first = repo.add_card(&owner, "4111111111111111", dec("100")).await?;
    let second = repo.add_card(&owner, "5500000000000004", dec("0")).await?;
    repo.add_card(&user(), "4000000000000002", dec("5")).await?;

    let cards = repo.user_cards(&owner).await?;
    let ids: Vec<Uuid> = cards.iter().map(|card| card.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(cards[0].current_amount, dec("100"));
    assert!(cards[0].limits.is_empty());
    assert!(repo.card_by_id(Uuid::new_v4()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_limit_and_plan_replace_same_month() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };
    let card = repo.add_card(&user(), "4111111111111111", dec("0")).await?;

    repo.add_card_limit(card.id, "2026-01", dec("500")).await?;
    repo.add_card_limit(card.id, "2026-02", dec("300")).await?;
    repo.add_card_limit(card.id, "2026-01", dec("800")).await?;
    repo.add_card_plan(card.id, "2026-01", dec("100")).await?;
    repo.add_card_plan(card.id, "2026-01", dec("250.5")).await?;

    let card = repo.card_by_id(card.id).await?.unwrap();
    assert_eq!(card.limits.len(), 2);
    assert_eq!(card.limits[0].month, "2026-01");
    assert_eq!(card.limits[0].amount, dec("800"));
    assert_eq!(card.plans.len(), 1);
    assert_eq!(card.plans[0].amount, dec("250.5"));
    Ok(())
}

#[tokio::test]
async fn test_wishes_are_appended() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };
    let card = repo.add_card(&user(), "4111111111111111", dec("0")).await?;

    repo.add_card_wish(card.id, "Bicycle", dec("600")).await?;
    repo.add_card_wish(card.id, "Bicycle", dec("650")).await?;

    let card = repo.card_by_id(card.id).await?.unwrap();
    assert_eq!(card.wishes.len(), 2);
    assert_eq!(card.wishes[1].target_amount, dec("650"));
    Ok(())
}

#[tokio::test]
async fn test_goal_for_missing_card_is_not_found() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };

    let result = repo.add_card_limit(Uuid::new_v4(), "2026-01", dec("1")).await;

    assert!(matches!(result, Err(CommitError::CardNotFound)));
    Ok(())
}

#[tokio::test]
async fn test_transaction_dated_today_moves_balance() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };
    let card = repo.add_card(&user(), "4111111111111111", dec("100")).await?;

    let cost = repo
        .add_transaction(transaction(card.id, TransactionKind::Cost, "30.25", today()))
        .await?;
    let past = today() - Duration::days(3);
    repo.add_transaction(transaction(card.id, TransactionKind::Income, "10", past))
        .await?;

    assert!(cost.is_affect);
    assert!(!cost.scheduled);
    let card = repo.card_by_id(card.id).await?.unwrap();
    assert_eq!(card.current_amount, dec("79.75"));
    assert_eq!(repo.current_transactions(card.id).await?.len(), 2);
    assert!(repo.scheduled_transactions(card.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_future_transaction_is_scheduled() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };
    let card = repo.add_card(&user(), "4111111111111111", dec("100")).await?;
    let tomorrow = today() + Duration::days(1);

    let stored = repo
        .add_transaction(transaction(card.id, TransactionKind::Cost, "40", tomorrow))
        .await?;

    assert!(stored.scheduled);
    assert!(!stored.is_affect);
    let card = repo.card_by_id(card.id).await?.unwrap();
    assert_eq!(card.current_amount, dec("100"));
    let scheduled = repo.scheduled_transactions(card.id).await?;
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].id, stored.id);
    assert!(repo.current_transactions(card.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_transactions_by_period_and_user() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };
    let owner = user();
    let first = repo.add_card(&owner, "4111111111111111", dec("100")).await?;
    let second = repo.add_card(&owner, "5500000000000004", dec("100")).await?;
    let week_ago = today() - Duration::days(7);

    repo.add_transaction(transaction(first.id, TransactionKind::Cost, "1", week_ago))
        .await?;
    repo.add_transaction(transaction(first.id, TransactionKind::Cost, "2", today()))
        .await?;
    repo.add_transaction(transaction(second.id, TransactionKind::Income, "3", today()))
        .await?;

    let recent = repo
        .transactions_by_period(first.id, today() - Duration::days(1), today())
        .await?;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].amount, dec("2"));

    let all = repo.user_transactions(&owner).await?;
    assert_eq!(all.len(), 3);
    assert_eq!(repo.card_transactions(first.id).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_transaction_for_missing_card_is_not_found() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };

    let result = repo
        .add_transaction(transaction(Uuid::new_v4(), TransactionKind::Cost, "1", today()))
        .await;

    assert!(matches!(result, Err(CommitError::CardNotFound)));
    Ok(())
}

#[tokio::test]
async fn test_overflowing_transaction_is_rolled_back() -> Result<()> {
    let Some(repo) = repository().await? else {
        return Ok(());
    };
    let card = repo.add_card(&user(), "4111111111111111", Decimal::MAX).await?;

    let result = repo
        .add_transaction(transaction(card.id, TransactionKind::Income, "1", today()))
        .await;

    assert!(matches!(result, Err(CommitError::InvalidData(_))));
    let card = repo.card_by_id(card.id).await?.unwrap();
    assert_eq!(card.current_amount, Decimal::MAX);
    assert!(repo.card_transactions(card.id).await?.is_empty());
    Ok(())
}
