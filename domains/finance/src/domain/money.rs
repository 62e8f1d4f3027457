//! Money formatting

use rust_decimal::{Decimal, RoundingStrategy};
use walletbot_common::CURRENCY_SIGN;

/// Two-decimal rendering, half away from zero: `12.5` -> `12.50`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Amount with the currency sign: `12.50 ₼`
pub fn format_money(amount: Decimal) -> String {
    format!("{} {}", format_amount(amount), CURRENCY_SIGN)
}

/// Entered amounts stay strictly below this many whole units
pub const MAX_WHOLE_AMOUNT: u64 = 1_000_000_000_000_000;

/// Decimal places an entered amount may carry
pub const AMOUNT_SCALE: u32 = 2;

/// Sum that pins at `Decimal::MAX`/`MIN` instead of overflowing
pub fn saturating_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
}
