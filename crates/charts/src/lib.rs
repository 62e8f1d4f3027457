//! Walletbot charts
//!
//! Builds QuickChart image URLs from transactions. Nothing is fetched here:
//! the chart configuration travels in the URL and the chat platform loads
//! the image itself.

mod builders;

use serde_json::Value;
use thiserror::Error;

pub use builders::TREND_DAYS;
pub use reqwest::Url;

pub const DEFAULT_QUICKCHART_URL: &str = "https://quickchart.io";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("Invalid chart service URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Unknown chart type: {0}")]
    UnknownKind(String),
}

/// Chart offered by `/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Category,
    IncomeExpense,
    Net,
    Trend,
    Scheduled,
    Total,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Category,
        ChartKind::IncomeExpense,
        ChartKind::Net,
        ChartKind::Trend,
        ChartKind::Scheduled,
        ChartKind::Total,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Category => "category",
            ChartKind::IncomeExpense => "income_expense",
            ChartKind::Net => "net",
            ChartKind::Trend => "trend",
            ChartKind::Scheduled => "scheduled",
            ChartKind::Total => "total",
        }
    }

    /// Button label in the chart menu
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Category => "🍩 Spending by Category",
            ChartKind::IncomeExpense => "📊 Income vs Expense",
            ChartKind::Net => "📈 Net Revenue",
            ChartKind::Trend => "📉 Spending Trend",
            ChartKind::Scheduled => "⏰ Scheduled Impact",
            ChartKind::Total => "💰 Total Revenue Breakdown",
        }
    }

    /// Short title used in the photo caption
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Category => "Spending by Category",
            ChartKind::IncomeExpense => "Income vs Expense",
            ChartKind::Net => "Net Revenue",
            ChartKind::Trend => "Spending Trend",
            ChartKind::Scheduled => "Scheduled Impact",
            ChartKind::Total => "Total Revenue",
        }
    }
}

impl std::str::FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ChartError::UnknownKind(s.to_string()))
    }
}

/// QuickChart endpoint
#[derive(Debug, Clone)]
pub struct QuickChart {
    endpoint: Url,
}

impl QuickChart {
    /// `base_url` is the service root, e.g. `https://quickchart.io`
    pub fn new(base_url: &str) -> Result<Self, ChartError> {
        let base = Url::parse(base_url)
            .map_err(|e| ChartError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ChartError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut endpoint = base;
        endpoint
            .path_segments_mut()
            .map_err(|_| ChartError::InvalidBaseUrl(base_url.to_string()))?
            .pop_if_empty()
            .push("chart");

        Ok(Self { endpoint })
    }

    /// Image URL rendering `config` at `width` x `height`
    pub fn url(&self, config: &Value, width: u32, height: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("c", &config.to_string())
            .append_pair("w", &width.to_string())
            .append_pair("h", &height.to_string());
        tracing::debug!(url_length = url.as_str().len(), "Chart URL built");
        url
    }
}
