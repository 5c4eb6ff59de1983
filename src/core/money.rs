use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of decimal places shown for euro amounts
pub const MONEY_SCALE: u32 = 2;

/// 9 999 999 999.99, the largest value of a `DECIMAL(12, 2)` column.
/// Stored amounts above it are treated as garbled.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Rounds an accumulated amount for presentation.
///
/// Accumulation always happens at full precision; only the value handed to
/// a response is rounded, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a stored amount that may be garbled.
///
/// Accepts plain and scientific notation. Returns `None` for empty,
/// unparseable, negative or out-of-range input so callers can coalesce to
/// another field.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;

    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    if value > MAX_AMOUNT {
        return None;
    }

    Some(value)
}

/// Whether an amount fits a money column: non-negative, cents precision,
/// at most [`MAX_AMOUNT`]
pub fn is_storable_amount(amount: Decimal) -> bool {
    amount >= Decimal::ZERO && amount <= MAX_AMOUNT && amount.normalize().scale() <= MONEY_SCALE
}

/// Reads an amount from a JSON body field that may be a number or a
/// numeric string. Non-finite values cannot be represented and yield `None`.
pub fn amount_from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => parse_signed(&n.to_string()),
        serde_json::Value::String(s) => parse_signed(s.trim()),
        _ => None,
    }
}

fn parse_signed(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Decimal that serializes as a JSON number instead of a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonAmount(#[serde(with = "rust_decimal::serde::arbitrary_precision")] pub Decimal);

impl From<Decimal> for JsonAmount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}
