//! Money normalization and cent-accurate arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::MONEY;
use crate::models::statement::ZERO_AMOUNT;

/// Largest magnitude, in cents, of a single amount (999,999,999,999,999.99).
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999_999_999_999;

/// Normalize an amount fragment to a signed two-decimal string.
///
/// A value wrapped entirely in parentheses is negative. Everything except
/// digits, `.` and `-` is dropped before parsing; anything that still fails
/// to parse, or whose magnitude exceeds [`MAX_AMOUNT_CENTS`], becomes
/// `"0.00"`.
pub fn normalize_amount(raw: &str) -> String {
    let trimmed = raw.trim();
    let parenthesized = trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')');

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let mut cents = parse_decimal(&cleaned).and_then(cents_of).unwrap_or(0);
    if parenthesized && cents > 0 {
        cents = -cents;
    }

    from_cents(i128::from(cents))
}

/// Whether a value is already in the signed two-decimal shape.
pub fn is_money(value: &str) -> bool {
    MONEY.is_match(value)
}

/// Parse a normalized amount to a number, `0.0` when unparseable.
pub fn amount_to_number(value: &str) -> f64 {
    parse_decimal(value.trim())
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Sum amounts in integer cents and format the result.
///
/// The total may exceed the range of a single amount; it stays exact.
pub fn sum_amounts<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    from_cents(sum_cents(values))
}

/// Total of the amounts in whole cents.
pub fn sum_cents<I, S>(values: I) -> i128
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| i128::from(to_cents(v.as_ref())))
        .sum()
}

/// Format a whole number of cents as an amount.
pub fn from_cents(cents: i128) -> String {
    Decimal::try_from_i128_with_scale(cents, 2)
        .map(format_cents)
        .unwrap_or_else(|_| ZERO_AMOUNT.to_string())
}

/// Compare two amounts after rounding each to cents.
pub fn equals_money(a: &str, b: &str) -> bool {
    to_cents(a) == to_cents(b)
}

/// An amount rounded to whole cents; `0` when unparseable or out of range,
/// matching what [`normalize_amount`] produces for the same input.
pub fn to_cents(value: &str) -> i64 {
    parse_decimal(value.trim()).and_then(cents_of).unwrap_or(0)
}

fn cents_of(value: Decimal) -> Option<i64> {
    round_cents(value)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
        .filter(|cents| cents.abs() <= MAX_AMOUNT_CENTS)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    // rust_decimal wants a digit before the point
    let s = if let Some(rest) = s.strip_prefix("-.") {
        format!("-0.{}", rest)
    } else if let Some(rest) = s.strip_prefix('.') {
        format!("0.{}", rest)
    } else {
        s.to_string()
    };
    Decimal::from_str(&s).ok()
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to cents and render with exactly two decimals.
pub(crate) fn format_cents(value: Decimal) -> String {
    let rounded = round_cents(value);
    if rounded.is_zero() {
        return ZERO_AMOUNT.to_string();
    }
    format!("{:.2}", rounded)
}
