//! Confidence scoring for rows, headers and whole documents.
//!
//! Each score is a weighted sum of structural features in `[0, 1]` plus a
//! small seeded perturbation that separates otherwise identical scores. The
//! perturbation is capped at 0.001 so it never outranks a real feature.

use crate::models::statement::{Footer, Header, Transaction};
use crate::normalize::{
    amount_to_number, is_iso_currency, is_iso_date, is_known, is_money, sum_amounts, sum_cents,
    to_cents,
};

/// Modulus of the rolling hash behind the tie-breaker.
const HASH_BASE: u64 = 1_000_003;

/// Maximum contribution of the tie-breaker.
const JITTER_SCALE: f64 = 0.001;

/// Description length at which the description feature saturates.
const DESCRIPTION_CAP: usize = 40;

/// Bonus added to the document score when the balances reconcile.
const RECONCILIATION_BONUS: f64 = 0.10;

/// Reproducible value in `[0, 1)` derived from `seed`.
pub fn tie_breaker(seed: &str) -> f64 {
    let hash = seed
        .chars()
        .fold(0u64, |acc, c| (acc * 31 + c as u64) % HASH_BASE);
    hash as f64 / HASH_BASE as f64
}

/// Clamp to `[0, 1]` and render with five decimals.
pub fn format_score(value: f64) -> String {
    let clamped = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
    format!("{:.5}", clamped)
}

/// Parse a score string back to a number (`0.0` when malformed).
pub fn score_value(score: &str) -> f64 {
    score.trim().parse::<f64>().unwrap_or(0.0)
}

/// Confidence of a single normalized transaction.
pub fn row_point(date: &str, description: &str, amount: &str, currency: &str) -> String {
    let mut score = 0.0;

    if is_iso_date(date) {
        score += 0.30;
    }
    if is_money(amount) {
        score += 0.40;
    }
    let description_len = if is_known(description) {
        description.chars().count().min(DESCRIPTION_CAP)
    } else {
        0
    };
    score += 0.20 * (description_len as f64 / DESCRIPTION_CAP as f64);
    if is_iso_currency(currency) {
        score += 0.10;
    }

    let seed = format!("{date}{description}{amount}{currency}");
    format_score(score + JITTER_SCALE * tie_breaker(&seed))
}

/// Confidence of a header, computed from its seven scalar fields.
pub fn header_point(header: &Header) -> String {
    let mut score = 0.0;

    if is_known(&header.bank) {
        score += 0.18;
    }
    if is_known(&header.bank_account) {
        score += 0.14;
    }
    if is_known(&header.customer_account_number) {
        score += 0.14;
    }
    if is_iso_date(&header.statement_date) {
        score += 0.18;
    }
    if is_balance(&header.opening_balance) {
        score += 0.12;
    }
    if is_balance(&header.closing_balance) {
        score += 0.12;
    }
    if is_iso_currency(&header.currency) {
        score += 0.12;
    }

    let seed = format!(
        "{}{}{}{}{}{}{}",
        header.bank,
        header.bank_account,
        header.customer_account_number,
        header.statement_date,
        header.opening_balance,
        header.closing_balance,
        header.currency,
    );
    format_score(score + JITTER_SCALE * tie_breaker(&seed))
}

/// Whether opening balance plus all transaction amounts equals the closing
/// balance, compared in whole cents.
pub fn is_balanced(header: &Header, transactions: &[Transaction]) -> bool {
    let total = sum_cents(transactions.iter().map(|t| t.amount.as_str()));
    i128::from(to_cents(&header.opening_balance)) + total
        == i128::from(to_cents(&header.closing_balance))
}

/// Document confidence: mean of header and average row confidence, plus the
/// reconciliation bonus, capped at 1.
pub fn doc_point(header: &Header, transactions: &[Transaction]) -> String {
    let rows_mean = if transactions.is_empty() {
        0.0
    } else {
        transactions
            .iter()
            .map(|t| score_value(&t.row_point))
            .sum::<f64>()
            / transactions.len() as f64
    };

    let base = (score_value(&header.row_point) + rows_mean) / 2.0;
    let bonus = if is_balanced(header, transactions) {
        RECONCILIATION_BONUS
    } else {
        0.0
    };

    format_score((base + bonus).min(1.0))
}

/// Footer statistics for a finalized header and transaction list.
pub fn footer_stats(header: &Header, transactions: &[Transaction]) -> Footer {
    Footer {
        num_transactions: transactions.len(),
        total_amount_parsed: sum_amounts(transactions.iter().map(|t| t.amount.as_str())),
        balanced: is_balanced(header, transactions),
        doc_point: doc_point(header, transactions),
    }
}

/// A balance counts as present when it is well formed and not the
/// `"0.00"` parse fallback.
fn is_balance(value: &str) -> bool {
    is_money(value) && amount_to_number(value) != 0.0
}
