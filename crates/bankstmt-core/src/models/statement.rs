//! Canonical statement record.
//!
//! Every field is a string (or a count/flag in the footer) and is always
//! present. Values that cannot be normalized carry the `"unknown"` or `"0.00"`
//! sentinels instead of being omitted.

use serde::{Deserialize, Serialize};

/// Sentinel for any text field that could not be normalized.
pub const UNKNOWN: &str = "unknown";

/// Sentinel for any amount that could not be parsed.
pub const ZERO_AMOUNT: &str = "0.00";

/// A complete normalized bank statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Account-level information.
    pub header: Header,

    /// Transactions in source order.
    pub transactions: Vec<Transaction>,

    /// Totals and document confidence.
    pub footer: Footer,
}

/// Statement header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub bank: String,
    pub bank_account: String,
    pub customer_account_number: String,
    /// ISO date or `"unknown"`.
    pub statement_date: String,
    pub opening_balance: String,
    pub closing_balance: String,
    /// ISO 4217 code or `"unknown"`.
    pub currency: String,
    /// Header confidence, five decimals.
    pub row_point: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            bank: UNKNOWN.to_string(),
            bank_account: UNKNOWN.to_string(),
            customer_account_number: UNKNOWN.to_string(),
            statement_date: UNKNOWN.to_string(),
            opening_balance: ZERO_AMOUNT.to_string(),
            closing_balance: ZERO_AMOUNT.to_string(),
            currency: UNKNOWN.to_string(),
            row_point: "0.00000".to_string(),
        }
    }
}

/// A single normalized transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
    /// Row confidence, five decimals.
    pub row_point: String,
}

/// Statement footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub num_transactions: usize,
    /// Cent-accurate sum of transaction amounts.
    pub total_amount_parsed: String,
    /// Whether opening + total equals closing.
    pub balanced: bool,
    /// Document confidence, five decimals.
    pub doc_point: String,
}

/// A transaction row as handed over by an ingestion path, before
/// normalization. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
}

impl RawRow {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            currency: currency.into(),
        }
    }
}

/// Header values found in the source, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderHints {
    pub bank: Option<String>,
    pub bank_account: Option<String>,
    pub customer_account_number: Option<String>,
    pub statement_date: Option<String>,
    pub opening_balance: Option<String>,
    pub closing_balance: Option<String>,
    pub currency: Option<String>,
}

/// Which cascade stage produced the text a statement was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Embedded text layer read directly.
    DirectText,
    /// Page content streams decoded one page at a time.
    ContentStream,
    /// Page images run through optical character recognition.
    Ocr,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::DirectText => "direct_text",
            ExtractionStrategy::ContentStream => "content_stream",
            ExtractionStrategy::Ocr => "ocr",
        }
    }
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement plus the non-fatal notes gathered while building it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedStatement {
    #[serde(flatten)]
    pub statement: Statement,

    /// Non-fatal issues, e.g. low text yield or OCR fallback.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Cascade stage that produced the text (text documents only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ExtractionStrategy>,
}
