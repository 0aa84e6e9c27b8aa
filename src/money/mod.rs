//! Decimal amount helpers.
//!
//! Expense amounts are carried as [`Decimal`] so cents accumulate exactly.
//! Every total in the crate goes through [`checked_total`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{EngineError, Result};

/// Sums `amounts`, failing instead of wrapping when the decimal range is exceeded.
pub fn checked_total<I>(amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| checked_add(acc, amount))
}

/// Adds a single amount to a running total.
pub fn checked_add(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total.checked_add(amount).ok_or_else(|| {
        EngineError::AmountOverflow(format!("{} + {} exceeds the decimal range", total, amount))
    })
}

/// Renders an amount with two fraction digits followed by `symbol`.
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if symbol.is_empty() {
        format!("{:.2}", rounded)
    } else {
        format!("{:.2} {}", rounded, symbol)
    }
}
