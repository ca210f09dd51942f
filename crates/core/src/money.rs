//! Money
//!
//! Conversions from decimal prices to minor units, and the ISO currencies the store can charge in.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::iso::{CAD, Currency, EUR, GBP, USD};
use thiserror::Error;

/// ISO code of the currency the store charges in unless configured otherwise.
pub const DEFAULT_CURRENCY_CODE: &str = "CAD";

/// Errors converting amounts into money.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyConversionError {
    /// The amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    OutOfRange(Decimal),

    /// The currency code is not one the store supports.
    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),
}

/// Convert a decimal amount into integer minor units (cents), rounding half away from zero.
///
/// # Errors
///
/// Returns [`MoneyConversionError::OutOfRange`] if the amount overflows an `i64` of minor units.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyConversionError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .ok_or(MoneyConversionError::OutOfRange(amount))
}

/// Resolve a (case-insensitive) ISO currency code the store accepts payments in.
///
/// # Errors
///
/// Returns [`MoneyConversionError::UnknownCurrency`] for anything else.
pub fn parse_currency(code: &str) -> Result<&'static Currency, MoneyConversionError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "CAD" => Ok(CAD),
        "USD" => Ok(USD),
        "GBP" => Ok(GBP),
        "EUR" => Ok(EUR),
        other => Err(MoneyConversionError::UnknownCurrency(other.to_string())),
    }
}
