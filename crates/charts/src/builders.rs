//! Chart configurations
//!
//! Only applied transactions (`is_affect`) are counted, except by the
//! scheduled views. Every builder returns None when there is nothing to draw.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::Url;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use walletbot_finance::reports::ProjectionPoint;
use walletbot_finance::{Transaction, TransactionKind};

use crate::QuickChart;

/// Days shown by the spending trend, counted from the latest spending day
pub const TREND_DAYS: usize = 30;

const WIDTH: u32 = 600;
const HEIGHT: u32 = 400;
const DOUGHNUT_WIDTH: u32 = 500;

const PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
];
const GREEN: &str = "#4BC0C0";
const RED: &str = "#FF6384";
const BLUE: &str = "#36A2EB";
const YELLOW: &str = "#FFCE56";

fn number(amount: Decimal) -> Value {
    json!(amount.round_dp(2).to_f64().unwrap_or_default())
}

fn title_options(title: &str) -> Value {
    json!({
        "display": true,
        "text": title,
        "fontSize": 18,
    })
}

fn y_axis(begin_at_zero: bool) -> Value {
    json!({ "yAxes": [{ "ticks": { "beginAtZero": begin_at_zero } }] })
}

fn applied(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> + '_ {
    transactions.iter().filter(|tx| tx.is_affect)
}

fn month_label(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map(|d| d.format("%b %y").to_string())
        .unwrap_or_else(|_| month.to_string())
}

fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[derive(Default, Clone, Copy)]
struct Flows {
    income: Decimal,
    expense: Decimal,
}

impl Flows {
    fn add(&mut self, tx: &Transaction) {
        match tx.kind {
            TransactionKind::Income => self.income = self.income.saturating_add(tx.amount),
            TransactionKind::Cost => self.expense = self.expense.saturating_add(tx.amount),
        }
    }

    fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }
}

/// Applied income and expense per `YYYY-MM`, months in order
fn monthly_flows(transactions: &[Transaction]) -> BTreeMap<String, Flows> {
    let mut months: BTreeMap<String, Flows> = BTreeMap::new();
    for tx in applied(transactions) {
        months
            .entry(tx.date.format("%Y-%m").to_string())
            .or_default()
            .add(tx);
    }
    months
}

impl QuickChart {
    /// Doughnut of applied costs per category
    pub fn spending_by_category(&self, transactions: &[Transaction], title: &str) -> Option<Url> {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for tx in applied(transactions).filter(|tx| tx.kind == TransactionKind::Cost) {
            let total = totals.entry(tx.category.as_str()).or_default();
            *total = total.saturating_add(tx.amount);
        }
        if totals.is_empty() {
            return None;
        }

        let labels: Vec<&str> = totals.keys().copied().collect();
        let data: Vec<Value> = totals.values().copied().map(number).collect();
        let config = json!({
            "type": "doughnut",
            "data": {
                "labels": labels,
                "datasets": [{ "data": data, "backgroundColor": PALETTE }],
            },
            "options": {
                "title": title_options(title),
                "plugins": {
                    "datalabels": {
                        "display": true,
                        "color": "#fff",
                        "font": { "weight": "bold" },
                    },
                },
            },
        });
        Some(self.url(&config, DOUGHNUT_WIDTH, HEIGHT))
    }

    /// Side-by-side income and expense bars per month
    pub fn income_vs_expense(&self, transactions: &[Transaction], title: &str) -> Option<Url> {
        let months = monthly_flows(transactions);
        if months.is_empty() {
            return None;
        }

        let labels: Vec<String> = months.keys().map(|m| month_label(m)).collect();
        let income: Vec<Value> = months.values().map(|f| number(f.income)).collect();
        let expense: Vec<Value> = months.values().map(|f| number(f.expense)).collect();
        let config = json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [
                    { "label": "Income", "data": income, "backgroundColor": GREEN },
                    { "label": "Expense", "data": expense, "backgroundColor": RED },
                ],
            },
            "options": { "title": title_options(title), "scales": y_axis(true) },
        });
        Some(self.url(&config, WIDTH, HEIGHT))
    }

    /// Net (income minus expense) per month, green when non-negative
    pub fn net_revenue(&self, transactions: &[Transaction], title: &str) -> Option<Url> {
        let months = monthly_flows(transactions);
        if months.is_empty() {
            return None;
        }

        let labels: Vec<String> = months.keys().map(|m| month_label(m)).collect();
        let nets: Vec<Decimal> = months.values().map(Flows::net).collect();
        let colors: Vec<&str> = nets
            .iter()
            .map(|net| if *net >= Decimal::ZERO { GREEN } else { RED })
            .collect();
        let data: Vec<Value> = nets.into_iter().map(number).collect();
        let config = json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [{ "label": "Net Revenue", "data": data, "backgroundColor": colors }],
            },
            "options": { "title": title_options(title), "scales": y_axis(false) },
        });
        Some(self.url(&config, WIDTH, HEIGHT))
    }

    /// Expected balance line through the scheduled transactions; the first
    /// point is the current balance
    pub fn scheduled_impact(&self, projection: &[ProjectionPoint], title: &str) -> Option<Url> {
        if projection.len() < 2 {
            return None;
        }

        let labels: Vec<String> = projection
            .iter()
            .map(|p| p.date.map(day_label).unwrap_or_else(|| "Current".to_string()))
            .collect();
        let data: Vec<Value> = projection.iter().map(|p| number(p.balance)).collect();
        let config = json!({
            "type": "line",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Expected Balance",
                    "data": data,
                    "fill": false,
                    "borderColor": BLUE,
                    "backgroundColor": BLUE,
                    "tension": 0.1,
                }],
            },
            "options": { "title": title_options(title), "scales": y_axis(false) },
        });
        Some(self.url(&config, WIDTH, HEIGHT))
    }

    /// Applied costs per day over the last `TREND_DAYS` days with spending
    pub fn spending_trend(&self, transactions: &[Transaction], title: &str) -> Option<Url> {
        let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for tx in applied(transactions).filter(|tx| tx.kind == TransactionKind::Cost) {
            let total = daily.entry(tx.date).or_default();
            *total = total.saturating_add(tx.amount);
        }
        if daily.is_empty() {
            return None;
        }

        let skip = daily.len().saturating_sub(TREND_DAYS);
        let recent: Vec<(NaiveDate, Decimal)> = daily.into_iter().skip(skip).collect();
        let labels: Vec<String> = recent.iter().map(|(d, _)| day_label(*d)).collect();
        let data: Vec<Value> = recent.iter().map(|(_, a)| number(*a)).collect();
        let config = json!({
            "type": "line",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Daily Spending",
                    "data": data,
                    "fill": true,
                    "borderColor": RED,
                    "backgroundColor": "rgba(255, 99, 132, 0.2)",
                    "tension": 0.3,
                }],
            },
            "options": { "title": title_options(title), "scales": y_axis(true) },
        });
        Some(self.url(&config, WIDTH, HEIGHT))
    }

    /// Applied versus scheduled totals, split by direction
    pub fn revenue_breakdown(&self, transactions: &[Transaction], title: &str) -> Option<Url> {
        if transactions.is_empty() {
            return None;
        }

        let mut current = Flows::default();
        let mut scheduled = Flows::default();
        for tx in transactions {
            if tx.is_affect {
                current.add(tx);
            } else if tx.scheduled {
                scheduled.add(tx);
            }
        }

        let config = json!({
            "type": "bar",
            "data": {
                "labels": [
                    "Current Income",
                    "Current Expense",
                    "Scheduled Income",
                    "Scheduled Expense"
                ],
                "datasets": [{
                    "data": [
                        number(current.income),
                        number(current.expense),
                        number(scheduled.income),
                        number(scheduled.expense),
                    ],
                    "backgroundColor": [GREEN, RED, BLUE, YELLOW],
                }],
            },
            "options": {
                "title": title_options(title),
                "legend": { "display": false },
                "scales": y_axis(true),
            },
        });
        Some(self.url(&config, WIDTH, HEIGHT))
    }
}
