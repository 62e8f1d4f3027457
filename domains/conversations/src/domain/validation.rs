//! Step input rules
//!
//! A rule turns raw chat text into the normalized value stored in the
//! accumulated map, or rejects it. Rejection never changes state.

use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use walletbot_finance::{TransactionKind, AMOUNT_SCALE, MAX_WHOLE_AMOUNT};

use super::state::{ConversationState, Field};

lazy_static::lazy_static! {
    /// Exactly sixteen digits, whitespace already removed
    pub static ref CARD_NUMBER_REGEX: Regex = Regex::new(r"^\d{16}$").unwrap();

    /// `YYYY-MM` with a real month
    pub static ref MONTH_REGEX: Regex = Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap();

    /// `YYYY-MM-DD`; calendar validity is checked separately
    pub static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Minimum signup password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Value must not be empty")]
    Empty,

    #[error("Must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Card number must be exactly 16 digits")]
    CardNumber,

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Amount must not be negative")]
    Negative,

    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Amount must be below {}", MAX_WHOLE_AMOUNT)]
    TooLarge,

    #[error("Amount may have at most {} decimal places", AMOUNT_SCALE)]
    TooPrecise,

    #[error("Unknown transaction type: {0}")]
    UnknownKind(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Date must be YYYY-MM-DD or \"today\"")]
    Date,

    #[error("Month must be YYYY-MM")]
    Month,

    #[error("Not one of the listed cards: {0}")]
    UnknownChoice(String),

    #[error("Card not found")]
    CardNotFound,
}

/// Validation applied to a step's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any non-blank text, stored trimmed
    NonEmpty,
    /// Stored verbatim; counts characters, not bytes
    MinLength(usize),
    /// Whitespace is stripped before matching
    CardNumber,
    /// Decimal amount `>= 0` when `allow_zero`, `> 0` otherwise
    Amount { allow_zero: bool },
    TransactionKind,
    /// One of the categories of the already collected transaction kind
    Category,
    /// Calendar date or the literal `today`, stored as `YYYY-MM-DD`
    Date,
    Month,
    /// 1-based index into the offered cards, or a card id among them
    CardChoice,
}

impl Rule {
    pub fn apply(
        &self,
        input: &str,
        state: &ConversationState,
        today: NaiveDate,
    ) -> Result<String, ValidationError> {
        let trimmed = input.trim();
        match self {
            Rule::NonEmpty => non_empty(trimmed).map(str::to_string),
            Rule::MinLength(min) => {
                if input.chars().count() < *min {
                    return Err(ValidationError::TooShort { min: *min });
                }
                Ok(input.to_string())
            }
            Rule::CardNumber => card_number(input),
            Rule::Amount { allow_zero } => amount(trimmed, *allow_zero).map(|a| a.to_string()),
            Rule::TransactionKind => TransactionKind::from_str(trimmed)
                .map(|kind| kind.as_str().to_string())
                .map_err(|_| ValidationError::UnknownKind(trimmed.to_string())),
            Rule::Category => category(trimmed, state),
            Rule::Date => date(trimmed, today).map(|d| d.format(DATE_FORMAT).to_string()),
            Rule::Month => month(trimmed).map(str::to_string),
            Rule::CardChoice => card_choice(trimmed, state).map(|id| id.to_string()),
        }
    }
}

fn non_empty(input: &str) -> Result<&str, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(input)
}

pub fn card_number(input: &str) -> Result<String, ValidationError> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if !CARD_NUMBER_REGEX.is_match(&digits) {
        return Err(ValidationError::CardNumber);
    }
    Ok(digits)
}

/// Strict decimal: no units, no thousands separators, no exponent.
/// At most `AMOUNT_SCALE` decimal places and below `MAX_WHOLE_AMOUNT`.
pub fn amount(input: &str, allow_zero: bool) -> Result<Decimal, ValidationError> {
    let value = Decimal::from_str(input)
        .map_err(|_| ValidationError::NotANumber(input.to_string()))?
        .normalize();

    if value < Decimal::ZERO {
        return Err(ValidationError::Negative);
    }
    if value.is_zero() && !allow_zero {
        return Err(ValidationError::NotPositive);
    }
    if value >= Decimal::from(MAX_WHOLE_AMOUNT) {
        return Err(ValidationError::TooLarge);
    }
    if value.scale() > AMOUNT_SCALE {
        return Err(ValidationError::TooPrecise);
    }
    Ok(value)
}

fn category(input: &str, state: &ConversationState) -> Result<String, ValidationError> {
    let kind = state
        .value(Field::Kind)
        .and_then(|k| TransactionKind::from_str(k).ok())
        .ok_or_else(|| ValidationError::UnknownCategory(input.to_string()))?;

    kind.categories()
        .iter()
        .find(|c| c.eq_ignore_ascii_case(input))
        .map(|c| c.to_string())
        .ok_or_else(|| ValidationError::UnknownCategory(input.to_string()))
}

pub fn date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if input.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    if !DATE_REGEX.is_match(input) {
        return Err(ValidationError::Date);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| ValidationError::Date)
}

pub fn month(input: &str) -> Result<&str, ValidationError> {
    if !MONTH_REGEX.is_match(input) {
        return Err(ValidationError::Month);
    }
    Ok(input)
}

fn card_choice(input: &str, state: &ConversationState) -> Result<Uuid, ValidationError> {
    if let Ok(index) = input.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| state.card_choices.get(i))
            .map(|choice| choice.card_id)
            .ok_or_else(|| ValidationError::UnknownChoice(input.to_string()));
    }

    let id = Uuid::parse_str(input).map_err(|_| ValidationError::UnknownChoice(input.to_string()))?;
    state
        .card_choices
        .iter()
        .find(|choice| choice.card_id == id)
        .map(|choice| choice.card_id)
        .ok_or(ValidationError::CardNotFound)
}
