//! Conversion between human-readable amounts and chain units.
//!
//! Coins carry [`DECIMALS`] fractional digits, so `"0.2"` is `20_000_000`
//! units. Assets choose their own decimals; the `*_quantity` variants take
//! them explicitly. Parsing is strict: no signs, no grouping commas, no
//! exponent, and never a silent rounding.

use thiserror::Error;

use crate::config::DECIMALS;

/// Errors from [`parse_units`] and [`parse_quantity`]. Each carries a
/// stable numeric code for callers that surface them over an API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("fraction can only have {max} decimals")]
    TooManyDecimals { max: u8 },

    #[error("incorrect input")]
    IncorrectInput,

    #[error("only digits and a single dot are accepted")]
    InvalidCharacters,

    #[error("amount does not fit in 64 bits")]
    Overflow,
}

impl AmountError {
    /// Machine-readable error code.
    pub fn code(&self) -> u8 {
        match self {
            Self::TooManyDecimals { .. } => 1,
            Self::IncorrectInput => 2,
            Self::InvalidCharacters => 3,
            Self::Overflow => 4,
        }
    }
}

/// Parse a coin amount into units.
pub fn parse_units(amount: &str) -> Result<u64, AmountError> {
    parse_quantity(amount, DECIMALS)
}

/// Format units as a coin amount with trailing fractional zeros trimmed.
pub fn format_units(units: u64) -> String {
    format_quantity(units, DECIMALS)
}

/// Parse `amount` into the smallest unit of something with `decimals`
/// fractional digits.
pub fn parse_quantity(amount: &str, decimals: u8) -> Result<u64, AmountError> {
    let mut parts = amount.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    if parts.next().is_some() || (whole.is_empty() && fraction.is_empty()) {
        return Err(AmountError::IncorrectInput);
    }
    if fraction.len() > usize::from(decimals) {
        return Err(AmountError::TooManyDecimals { max: decimals });
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::InvalidCharacters);
    }

    let scale = 10u64
        .checked_pow(u32::from(decimals))
        .ok_or(AmountError::Overflow)?;
    let whole_units = digits_value(whole)?
        .checked_mul(scale)
        .ok_or(AmountError::Overflow)?;
    let fraction_scale = 10u64.pow(u32::from(decimals) - fraction.len() as u32);
    let fraction_units = digits_value(fraction)? * fraction_scale;
    whole_units
        .checked_add(fraction_units)
        .ok_or(AmountError::Overflow)
}

/// Format `quantity` smallest units with `decimals` fractional digits.
pub fn format_quantity(quantity: u64, decimals: u8) -> String {
    let Some(scale) = 10u64.checked_pow(u32::from(decimals)) else {
        return quantity.to_string();
    };
    let whole = quantity / scale;
    let fraction = quantity % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = usize::from(decimals));
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Total coin units for an order of `quantity` asset units at `price` coin
/// units per whole coin, rounded half up.
pub fn total_order_price(quantity: u64, price: u64) -> Result<u64, AmountError> {
    let scale = u128::from(10u64.pow(u32::from(DECIMALS)));
    let product = u128::from(quantity) * u128::from(price);
    let total = (product + scale / 2) / scale;
    u64::try_from(total).map_err(|_| AmountError::Overflow)
}

fn digits_value(digits: &str) -> Result<u64, AmountError> {
    digits.bytes().try_fold(0u64, |acc, b| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or(AmountError::Overflow)
    })
}
