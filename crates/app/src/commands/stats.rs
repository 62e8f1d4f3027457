//! `/stats` menus and chart selection
//!
//! The chosen period travels inside the chart buttons' callback data, so
//! nothing is remembered between the two menus.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use walletbot_charts::{ChartKind, QuickChart, Url};
use walletbot_common::{Button, Reply};
use walletbot_finance::reports::{self, StatsPeriod};
use walletbot_finance::Transaction;

pub const GENERATING: &str = "⏳ Generating chart...";
pub const NOT_ENOUGH_DATA: &str =
    "📭 Not enough data to generate this chart. Try adding more transactions!";
pub const CHART_FAILED: &str = "❌ Failed to generate chart. Please try again.";

fn period_icon(period: StatsPeriod) -> &'static str {
    match period {
        StatsPeriod::Week => "📅",
        StatsPeriod::Month => "📆",
        StatsPeriod::ThreeMonths => "🗓️",
        StatsPeriod::Year => "📊",
        StatsPeriod::All => "🌐",
    }
}

pub fn period_menu() -> Reply {
    Reply::text("📊 *Select a time period for statistics:*").with_buttons(
        StatsPeriod::ALL.into_iter().map(|period| {
            Button::new(
                format!("{} {}", period_icon(period), period.label()),
                format!("stats:{}", period.as_str()),
            )
        }),
    )
}

pub fn chart_menu(period: StatsPeriod) -> Reply {
    Reply::text("📊 *Select a chart type:*").with_buttons(ChartKind::ALL.into_iter().map(
        |kind| {
            Button::new(
                kind.label(),
                format!("chart:{}:{}", period.as_str(), kind.as_str()),
            )
        },
    ))
}

/// Chart image for `kind`.
///
/// Period charts draw only the transactions dated inside `period`; the
/// scheduled and total charts look at everything. `balance` is the user's
/// current total across cards.
pub fn chart(
    charts: &QuickChart,
    kind: ChartKind,
    period: StatsPeriod,
    today: NaiveDate,
    transactions: &[Transaction],
    balance: Decimal,
) -> Option<Url> {
    let in_period = || reports::within(transactions, period.date_range(today));
    let titled = |name: &str| format!("{} ({})", name, period.label());

    match kind {
        ChartKind::Category => {
            charts.spending_by_category(&in_period(), &titled("Spending by Category"))
        }
        ChartKind::IncomeExpense => {
            charts.income_vs_expense(&in_period(), &titled("Income vs Expense"))
        }
        ChartKind::Net => charts.net_revenue(&in_period(), &titled("Net Revenue")),
        ChartKind::Trend => charts.spending_trend(&in_period(), &titled("Spending Trend")),
        ChartKind::Scheduled => {
            let scheduled: Vec<Transaction> =
                transactions.iter().filter(|tx| tx.scheduled).cloned().collect();
            let projection = reports::scheduled_projection(balance, &scheduled);
            charts.scheduled_impact(&projection, "Scheduled Transactions Impact")
        }
        ChartKind::Total => charts.revenue_breakdown(transactions, "Total Revenue Breakdown"),
    }
}

/// Photo reply for a rendered chart, or the not-enough-data notice
pub fn chart_reply(kind: ChartKind, url: Option<Url>) -> Reply {
    match url {
        Some(url) => Reply::photo(url.as_str(), format!("📊 {}", kind.title())),
        None => Reply::text(NOT_ENOUGH_DATA),
    }
}
