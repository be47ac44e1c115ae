//! Currency normalization to ISO 4217 codes.

use super::patterns::{AMOUNT_CURRENCY_TOKEN, CURRENCY_CODE, CURRENCY_TABLE, ISO_CURRENCY};
use crate::models::statement::UNKNOWN;

/// Normalize a currency fragment to a three-letter code, or `"unknown"`.
///
/// Resolution order: exact symbol/code lookup, a bare three-letter code,
/// then any known symbol appearing anywhere in the fragment.
pub fn normalize_currency(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return UNKNOWN.to_string();
    }

    lookup_exact(s)
        .or_else(|| strict_code(s))
        .or_else(|| scan_symbols(s))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Whether a value is a strict uppercase three-letter code.
pub fn is_iso_currency(value: &str) -> bool {
    ISO_CURRENCY.is_match(value)
}

/// Currency named by an explicit token inside an amount field, if any.
pub fn currency_in_amount(amount_field: &str) -> Option<String> {
    let caps = AMOUNT_CURRENCY_TOKEN.captures(amount_field)?;
    let token = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let code = normalize_currency(token);
    is_iso_currency(&code).then_some(code)
}

fn lookup_exact(s: &str) -> Option<String> {
    let upper = s.to_uppercase();
    CURRENCY_TABLE
        .iter()
        .find(|(key, _)| *key == upper)
        .map(|(_, code)| code.to_string())
}

fn strict_code(s: &str) -> Option<String> {
    CURRENCY_CODE.is_match(s).then(|| s.to_uppercase())
}

fn scan_symbols(s: &str) -> Option<String> {
    CURRENCY_TABLE
        .iter()
        .filter(|(key, _)| !key.chars().all(|c| c.is_ascii_alphabetic()))
        .find(|(symbol, _)| s.contains(symbol))
        .map(|(_, code)| code.to_string())
}
