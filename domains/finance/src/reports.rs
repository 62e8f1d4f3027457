//! Derived views over cards and transactions
//!
//! Pure functions; callers fetch the data and pass `today` in.

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::entities::{Card, MonthlyTarget, Transaction, TransactionKind, Wish};
use crate::domain::money::saturating_sum;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const BAR_CELLS: usize = 10;

/// `YYYY-MM` key of a date
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn total_balance(cards: &[Card]) -> Decimal {
    saturating_sum(cards.iter().map(|c| c.current_amount))
}

/// `part / whole` as a percentage clamped to `[0, 100]`
pub fn clamped_percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO || part >= whole {
        return HUNDRED;
    }
    if part <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    // part < whole, so the ratio is below one
    (part / whole).saturating_mul(HUNDRED).clamp(Decimal::ZERO, HUNDRED)
}

/// Ten-cell bar: `█` per filled tenth (rounded), `░` for the rest
pub fn progress_bar(percentage: Decimal) -> String {
    let tenths = (percentage / Decimal::TEN)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::TEN);
    let filled = tenths.to_usize().unwrap_or(0).min(BAR_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

/// Spending against a card's limit for one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitStatus {
    pub month: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub percentage: Decimal,
    pub remaining: Decimal,
    /// Amount beyond the limit, when exceeded
    pub over_by: Option<Decimal>,
    pub bar: String,
}

/// Sum of applied costs dated within `month`
pub fn month_spending(transactions: &[Transaction], month: &str) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Cost && tx.is_affect)
            .filter(|tx| month_key(tx.date) == month)
            .map(|tx| tx.amount),
    )
}

/// Limit status for `month`, or None when the card has no limit for it
pub fn limit_status(card: &Card, transactions: &[Transaction], month: &str) -> Option<LimitStatus> {
    let limit = card.limit_for(month)?;
    let spent = month_spending(transactions, month);
    let percentage = clamped_percentage(spent, limit.amount);

    Some(LimitStatus {
        month: month.to_string(),
        limit: limit.amount,
        spent,
        percentage,
        remaining: limit.amount.saturating_sub(spent).max(Decimal::ZERO),
        over_by: (spent > limit.amount).then(|| spent.saturating_sub(limit.amount)),
        bar: progress_bar(percentage),
    })
}

/// Balance progress towards a wish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishProgress {
    pub wish: Wish,
    pub percentage: Decimal,
    pub remaining: Decimal,
    pub achieved: bool,
    pub bar: String,
}

pub fn wish_progress(balance: Decimal, wish: &Wish) -> WishProgress {
    let percentage = clamped_percentage(balance, wish.target_amount);
    WishProgress {
        wish: wish.clone(),
        percentage,
        remaining: wish.target_amount.saturating_sub(balance).max(Decimal::ZERO),
        achieved: balance >= wish.target_amount,
        bar: progress_bar(percentage),
    }
}

/// Whether the current balance meets a minimum-balance plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStatus {
    pub plan: MonthlyTarget,
    pub met: bool,
}

pub fn plan_statuses(card: &Card) -> Vec<PlanStatus> {
    card.plans
        .iter()
        .map(|plan| PlanStatus {
            plan: plan.clone(),
            met: card.current_amount >= plan.amount,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduledSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

pub fn scheduled_summary(transactions: &[Transaction]) -> ScheduledSummary {
    let (income, expense) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), tx| match tx.kind {
            TransactionKind::Income => (income.saturating_add(tx.amount), expense),
            TransactionKind::Cost => (income, expense.saturating_add(tx.amount)),
        },
    );
    ScheduledSummary {
        income,
        expense,
        net: income.saturating_sub(expense),
    }
}

/// One point of a running-balance projection; `date` is None for the
/// starting (current) balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionPoint {
    pub date: Option<NaiveDate>,
    pub balance: Decimal,
}

/// Running balance from `current_balance` through `scheduled` in date order
pub fn scheduled_projection(
    current_balance: Decimal,
    scheduled: &[Transaction],
) -> Vec<ProjectionPoint> {
    let mut ordered: Vec<&Transaction> = scheduled.iter().collect();
    ordered.sort_by_key(|tx| tx.date);

    let mut balance = current_balance;
    let mut points = vec![ProjectionPoint {
        date: None,
        balance,
    }];
    for tx in ordered {
        balance = balance.saturating_add(tx.kind.signed(tx.amount));
        points.push(ProjectionPoint {
            date: Some(tx.date),
            balance,
        });
    }
    points
}

/// Statistics period offered by `/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsPeriod {
    Week,
    Month,
    ThreeMonths,
    Year,
    All,
}

impl StatsPeriod {
    pub const ALL: [StatsPeriod; 5] = [
        StatsPeriod::Week,
        StatsPeriod::Month,
        StatsPeriod::ThreeMonths,
        StatsPeriod::Year,
        StatsPeriod::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
            StatsPeriod::ThreeMonths => "3months",
            StatsPeriod::Year => "year",
            StatsPeriod::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatsPeriod::Week => "This Week",
            StatsPeriod::Month => "This Month",
            StatsPeriod::ThreeMonths => "Last 3 Months",
            StatsPeriod::Year => "This Year",
            StatsPeriod::All => "All Time",
        }
    }

    /// Inclusive date range of this period as seen on `today`
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            StatsPeriod::Week => (today - Duration::days(7), today),
            StatsPeriod::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(today);
                (first, last)
            }
            StatsPeriod::ThreeMonths => (
                today.checked_sub_months(Months::new(3)).unwrap_or(today),
                today,
            ),
            StatsPeriod::Year => (
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
                today,
            ),
            StatsPeriod::All => (
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
                NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX),
            ),
        }
    }
}

impl std::str::FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(StatsPeriod::Week),
            "month" => Ok(StatsPeriod::Month),
            "3months" => Ok(StatsPeriod::ThreeMonths),
            "year" => Ok(StatsPeriod::Year),
            "all" => Ok(StatsPeriod::All),
            other => Err(format!("Unknown statistics period: {}", other)),
        }
    }
}

/// Transactions dated within `[start, end]`
pub fn within(
    transactions: &[Transaction],
    (start, end): (NaiveDate, NaiveDate),
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.date >= start && tx.date <= end)
        .cloned()
        .collect()
}
