//! Header labels and transaction rows from extracted document text.

use regex::Regex;
use tracing::debug;

use crate::models::config::ParsingConfig;
use crate::models::statement::{HeaderHints, RawRow, UNKNOWN};
use crate::normalize::patterns::{
    ACCOUNT_NUMBER, BANK_HINTS, CLOSING_BALANCE, CURRENCY_LABEL, CUSTOMER_NUMBER, DATE_TOKEN,
    OPENING_BALANCE, ROW_ISO, ROW_NAMED_MONTH, ROW_NUMERIC, STATEMENT_DATE,
};
use crate::normalize::{
    currency_in_amount, find_iso_dates, is_iso_currency, normalize_currency, to_iso_date,
};

/// Minimum length of a line taken as the bank name without a hint word.
const MIN_BANK_NAME_LEN: usize = 3;

/// Fields found in a statement's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub hints: HeaderHints,
    pub rows: Vec<RawRow>,
}

/// Pulls header hints and transaction rows out of plain statement text.
pub struct PdfFieldExtractor {
    bank_name_window: usize,
    statement_date_window: usize,
}

impl PdfFieldExtractor {
    pub fn new() -> Self {
        Self::from_config(&ParsingConfig::default())
    }

    pub fn from_config(config: &ParsingConfig) -> Self {
        Self {
            bank_name_window: config.bank_name_window,
            statement_date_window: config.statement_date_window,
        }
    }

    /// Extract header hints and rows.
    pub fn extract(&self, text: &str) -> ExtractedFields {
        let hints = self.header_hints(text);
        let header_currency = hints.currency.as_deref().map(normalize_currency);
        let rows = self.transaction_rows(text, header_currency.as_deref());

        debug!(
            "Extracted {} transaction rows; bank={:?} account={:?}",
            rows.len(),
            hints.bank,
            hints.bank_account
        );

        ExtractedFields { hints, rows }
    }

    /// Labeled header values plus the inferred bank name and statement date.
    pub fn header_hints(&self, text: &str) -> HeaderHints {
        let lines: Vec<&str> = text.lines().collect();

        HeaderHints {
            bank: self.bank_name(&lines),
            bank_account: bank_account_label(text),
            customer_account_number: first_capture(&CUSTOMER_NUMBER, text),
            statement_date: self.statement_date(text, &lines),
            opening_balance: first_capture(&OPENING_BALANCE, text),
            closing_balance: first_capture(&CLOSING_BALANCE, text),
            currency: first_capture(&CURRENCY_LABEL, text),
        }
    }

    /// Bank name from the first lines of the document.
    ///
    /// Blank lines, table headings, labeled fields and lines holding a date
    /// are skipped. A line with bank vocabulary wins; otherwise the first
    /// remaining line long enough to be a name.
    pub fn bank_name(&self, lines: &[&str]) -> Option<String> {
        let candidates: Vec<&str> = lines
            .iter()
            .take(self.bank_name_window)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .filter(|line| !is_table_heading(line))
            .filter(|line| !is_labeled_field(line))
            .filter(|line| !DATE_TOKEN.is_match(line))
            .collect();

        candidates
            .iter()
            .find(|line| has_bank_hint(line))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|line| line.chars().count() >= MIN_BANK_NAME_LEN)
            })
            .map(|line| line.to_string())
    }

    /// The labeled statement date, or else the latest date near the top.
    pub fn statement_date(&self, text: &str, lines: &[&str]) -> Option<String> {
        if let Some(labeled) = first_capture(&STATEMENT_DATE, text) {
            if to_iso_date(&labeled) != UNKNOWN {
                return Some(labeled);
            }
            debug!("Unreadable statement date label: {:?}", labeled);
        }

        let head = lines
            .iter()
            .take(self.statement_date_window)
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        // ISO strings order lexically by date
        find_iso_dates(&head).into_iter().max()
    }

    /// Transaction lines, each matched against the row patterns in order.
    pub fn transaction_rows(&self, text: &str, header_currency: Option<&str>) -> Vec<RawRow> {
        let patterns: [&Regex; 3] = [&ROW_ISO, &ROW_NUMERIC, &ROW_NAMED_MONTH];

        text.lines()
            .filter_map(|line| {
                let caps = patterns.iter().find_map(|re| re.captures(line))?;
                let amount = caps["amount"].trim().to_string();
                Some(RawRow {
                    date: caps["date"].to_string(),
                    description: caps["description"].trim().to_string(),
                    currency: resolve_row_currency(&amount, header_currency),
                    amount,
                })
            })
            .collect()
    }
}

impl Default for PdfFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A row's currency: an explicit token in its amount field, then the
/// header currency, then `"unknown"`.
pub fn resolve_row_currency(amount_field: &str, header_currency: Option<&str>) -> String {
    currency_from_amount(amount_field)
        .or_else(|| currency_from_header(header_currency))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn currency_from_amount(amount_field: &str) -> Option<String> {
    currency_in_amount(amount_field)
}

fn currency_from_header(header_currency: Option<&str>) -> Option<String> {
    header_currency
        .filter(|code| is_iso_currency(code))
        .map(str::to_string)
}

/// First "Account Number:" value not belonging to a "Customer Account
/// Number:" label.
fn bank_account_label(text: &str) -> Option<String> {
    ACCOUNT_NUMBER.captures_iter(text).find_map(|caps| {
        let label = caps.get(0)?;
        let before = text[..label.start()].trim_end().to_lowercase();
        if before.ends_with("customer") {
            return None;
        }
        caps.get(1).map(|m| m.as_str().trim().to_string())
    })
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_table_heading(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with("date")
        || lower.contains("description")
        || lower.contains("amount")
        || lower.contains("balance")
}

fn is_labeled_field(line: &str) -> bool {
    ACCOUNT_NUMBER.is_match(line)
        || CUSTOMER_NUMBER.is_match(line)
        || STATEMENT_DATE.is_match(line)
        || CURRENCY_LABEL.is_match(line)
}

fn has_bank_hint(line: &str) -> bool {
    let lower = line.to_lowercase();
    BANK_HINTS.iter().any(|hint| lower.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
Statement of Account
Sample Bank of Manila
Account Number: 0012-3456-7890
Customer Account Number: C-99881
Statement Date: Jul 31, 2025
Currency: PHP
Opening Balance: 1,000.00
Date        Description            Amount      Balance
2025-07-02  ATM Withdrawal         -500.00     500.00
07/05/2025  Payroll Credit         PHP 2,000.00
Aug 1, 2025 Card purchase          (120.50)
not a transaction line 12.00
Closing Balance: 2,379.50
";

    #[test]
    fn test_header_hints() {
        let hints = PdfFieldExtractor::new().header_hints(SAMPLE);
        assert_eq!(hints.bank.as_deref(), Some("Sample Bank of Manila"));
        assert_eq!(hints.bank_account.as_deref(), Some("0012-3456-7890"));
        assert_eq!(hints.customer_account_number.as_deref(), Some("C-99881"));
        assert_eq!(hints.statement_date.as_deref(), Some("Jul 31, 2025"));
        assert_eq!(hints.currency.as_deref(), Some("PHP"));
        assert_eq!(hints.opening_balance.as_deref(), Some("1,000.00"));
        assert_eq!(hints.closing_balance.as_deref(), Some("2,379.50"));
    }

    #[test]
    fn test_transaction_rows() {
        let fields = PdfFieldExtractor::new().extract(SAMPLE);
        assert_eq!(fields.rows, vec![
            RawRow::new("2025-07-02", "ATM Withdrawal", "-500.00", "PHP"),
            RawRow::new("07/05/2025", "Payroll Credit", "PHP 2,000.00", "PHP"),
            RawRow::new("Aug 1, 2025", "Card purchase", "(120.50)", "PHP"),
        ]);
    }

    #[test]
    fn test_amount_token_beats_header_currency() {
        assert_eq!(resolve_row_currency("USD 12.00", Some("PHP")), "USD");
        assert_eq!(resolve_row_currency("$12.00", None), "USD");
        assert_eq!(resolve_row_currency("12.00", Some("PHP")), "PHP");
        assert_eq!(resolve_row_currency("12.00", Some("unknown")), "unknown");
        assert_eq!(resolve_row_currency("12.00", None), "unknown");
    }

    #[test]
    fn test_customer_label_is_not_the_bank_account() {
        let text = "Customer Account Number: 555\nAccount No: 777\n";
        let hints = PdfFieldExtractor::new().header_hints(text);
        assert_eq!(hints.bank_account.as_deref(), Some("777"));
        assert_eq!(hints.customer_account_number.as_deref(), Some("555"));
    }

    #[test]
    fn test_account_label_needs_colon() {
        let hints = PdfFieldExtractor::new().header_hints("Savings account number 12345\n");
        assert_eq!(hints.bank_account, None);
    }

    #[test]
    fn test_bank_name_falls_back_to_first_long_line() {
        let lines = ["", "Date Description Amount", "2025-07-01", "ok", "Acme Holdings"];
        assert_eq!(
            PdfFieldExtractor::new().bank_name(&lines).as_deref(),
            Some("Acme Holdings")
        );
        assert_eq!(PdfFieldExtractor::new().bank_name(&["", "ab"]), None);
    }

    #[test]
    fn test_bank_name_window() {
        let mut lines = vec!["x"; 8];
        lines.push("First National Bank");
        assert_eq!(PdfFieldExtractor::new().bank_name(&lines), None);
    }

    #[test]
    fn test_statement_date_inferred_from_latest_date() {
        let text = "Sample Bank\nPeriod: 2025-07-01 to 31/07/2025\n\n2025-07-02 Coffee -3.50\n";
        let extractor = PdfFieldExtractor::new();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            extractor.statement_date(text, &lines).as_deref(),
            Some("2025-07-31")
        );
    }

    #[test]
    fn test_statement_date_absent() {
        let extractor = PdfFieldExtractor::new();
        assert_eq!(extractor.statement_date("no dates here", &["no dates here"]), None);
    }
}
