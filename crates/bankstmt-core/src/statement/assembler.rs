//! Builds the final statement from raw rows and header hints.

use tracing::debug;

use crate::models::statement::{Header, HeaderHints, RawRow, Statement, Transaction, UNKNOWN};
use crate::normalize::{
    clean_bank_name, clean_description, clean_identifier, is_iso_currency, normalize_amount,
    normalize_currency, to_iso_date,
};
use crate::scoring::{footer_stats, header_point, row_point};

/// Assembles normalized statements.
pub struct StatementAssembler;

impl StatementAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Normalize and score everything, in this order: rows, header scalars,
    /// header currency, row currency backfill, header score, footer.
    pub fn assemble(&self, hints: &HeaderHints, rows: &[RawRow]) -> Statement {
        let mut transactions: Vec<Transaction> = rows.iter().map(normalize_row).collect();

        let mut header = normalize_header(hints);
        header.currency = resolve_header_currency(hints.currency.as_deref(), &transactions);

        let mut backfilled = 0;
        for transaction in transactions
            .iter_mut()
            .filter(|t| !is_iso_currency(&t.currency))
        {
            transaction.currency = header.currency.clone();
            transaction.row_point = score_transaction(transaction);
            backfilled += 1;
        }

        header.row_point = header_point(&header);
        let footer = footer_stats(&header, &transactions);

        debug!(
            "Assembled statement: {} transactions ({} currency backfills), balanced={}",
            transactions.len(),
            backfilled,
            footer.balanced
        );

        Statement {
            header,
            transactions,
            footer,
        }
    }
}

impl Default for StatementAssembler {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_row(raw: &RawRow) -> Transaction {
    let mut transaction = Transaction {
        date: to_iso_date(&raw.date),
        description: clean_description(&raw.description),
        amount: normalize_amount(&raw.amount),
        currency: normalize_currency(&raw.currency),
        row_point: String::new(),
    };
    transaction.row_point = score_transaction(&transaction);
    transaction
}

fn score_transaction(t: &Transaction) -> String {
    row_point(&t.date, &t.description, &t.amount, &t.currency)
}

fn normalize_header(hints: &HeaderHints) -> Header {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    Header {
        bank: clean_bank_name(&field(&hints.bank)),
        bank_account: clean_identifier(&field(&hints.bank_account)),
        customer_account_number: clean_identifier(&field(&hints.customer_account_number)),
        statement_date: to_iso_date(&field(&hints.statement_date)),
        opening_balance: normalize_amount(&field(&hints.opening_balance)),
        closing_balance: normalize_amount(&field(&hints.closing_balance)),
        currency: UNKNOWN.to_string(),
        ..Header::default()
    }
}

/// Header currency: the explicit hint when it normalizes, else the most
/// common row currency (first seen wins ties), else `"unknown"`.
pub fn resolve_header_currency(hint: Option<&str>, transactions: &[Transaction]) -> String {
    currency_from_hint(hint)
        .or_else(|| majority_currency(transactions))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn currency_from_hint(hint: Option<&str>) -> Option<String> {
    let code = normalize_currency(hint?);
    is_iso_currency(&code).then_some(code)
}

fn majority_currency(transactions: &[Transaction]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for t in transactions.iter().filter(|t| is_iso_currency(&t.currency)) {
        match counts.iter_mut().find(|(code, _)| *code == t.currency) {
            Some((_, count)) => *count += 1,
            None => counts.push((&t.currency, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (code, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((code, count));
        }
    }
    best.map(|(code, _)| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_value;
    use pretty_assertions::assert_eq;

    fn hints() -> HeaderHints {
        HeaderHints {
            bank: Some("Sample  Bank, Inc.".to_string()),
            bank_account: Some("0012-3456".to_string()),
            customer_account_number: Some("C-99".to_string()),
            statement_date: Some("31/07/2025".to_string()),
            opening_balance: Some("100.00".to_string()),
            closing_balance: Some("150.00".to_string()),
            currency: None,
        }
    }

    #[test]
    fn test_header_normalization() {
        let statement = StatementAssembler::new().assemble(&hints(), &[]);
        let header = statement.header;
        assert_eq!(header.bank, "Sample Bank Inc");
        assert_eq!(header.bank_account, "00123456");
        assert_eq!(header.customer_account_number, "C99");
        assert_eq!(header.statement_date, "2025-07-31");
        assert_eq!(header.opening_balance, "100.00");
        assert_eq!(header.currency, "unknown");
    }

    #[test]
    fn test_majority_currency_and_backfill() {
        let rows = vec![
            RawRow::new("2025-07-01", "Salary", "60.00", "usd"),
            RawRow::new("2025-07-02", "Coffee", "-5.00", ""),
            RawRow::new("2025-07-03", "Transfer", "-5.00", "EUR"),
            RawRow::new("2025-07-04", "Books", "0.00", "$"),
        ];
        let statement = StatementAssembler::new().assemble(&hints(), &rows);

        assert_eq!(statement.header.currency, "USD");
        let currencies: Vec<&str> = statement
            .transactions
            .iter()
            .map(|t| t.currency.as_str())
            .collect();
        assert_eq!(currencies, vec!["USD", "USD", "EUR", "USD"]);

        // backfilled rows are rescored with their new currency
        let coffee = &statement.transactions[1];
        assert_eq!(
            coffee.row_point,
            row_point(&coffee.date, &coffee.description, &coffee.amount, "USD")
        );
    }

    #[test]
    fn test_majority_tie_goes_to_first_seen() {
        let rows = vec![
            RawRow::new("2025-07-01", "A", "1.00", "EUR"),
            RawRow::new("2025-07-02", "B", "1.00", "GBP"),
            RawRow::new("2025-07-03", "C", "1.00", "GBP"),
            RawRow::new("2025-07-04", "D", "1.00", "EUR"),
        ];
        let statement = StatementAssembler::new().assemble(&HeaderHints::default(), &rows);
        assert_eq!(statement.header.currency, "EUR");
    }

    #[test]
    fn test_explicit_currency_hint_wins() {
        let mut hints = hints();
        hints.currency = Some("₱".to_string());
        let rows = vec![RawRow::new("2025-07-01", "Salary", "50.00", "USD")];

        let statement = StatementAssembler::new().assemble(&hints, &rows);
        assert_eq!(statement.header.currency, "PHP");
        // a row with its own code keeps it
        assert_eq!(statement.transactions[0].currency, "USD");
    }

    #[test]
    fn test_no_currency_anywhere() {
        let rows = vec![RawRow::new("2025-07-01", "Salary", "50.00", "")];
        let statement = StatementAssembler::new().assemble(&HeaderHints::default(), &rows);
        assert_eq!(statement.header.currency, "unknown");
        assert_eq!(statement.transactions[0].currency, "unknown");
    }

    #[test]
    fn test_reconciled_statement() {
        let rows = vec![
            RawRow::new("07/02/2025", "Deposit", "60.00", "USD"),
            RawRow::new("07/03/2025", "Coffee", "(10.00)", "USD"),
        ];
        let statement = StatementAssembler::new().assemble(&hints(), &rows);

        assert_eq!(statement.footer.num_transactions, 2);
        assert_eq!(statement.footer.total_amount_parsed, "50.00");
        assert!(statement.footer.balanced);
        assert!(score_value(&statement.footer.doc_point) <= 1.0);
        assert_eq!(statement.transactions[1].amount, "-10.00");
    }

    #[test]
    fn test_rows_keep_source_order() {
        let rows = vec![
            RawRow::new("2025-07-09", "Later", "1.00", "USD"),
            RawRow::new("2025-07-01", "Earlier", "1.00", "USD"),
        ];
        let statement = StatementAssembler::new().assemble(&HeaderHints::default(), &rows);
        assert_eq!(statement.transactions[0].description, "Later");
        assert_eq!(statement.transactions[1].description, "Earlier");
    }

    #[test]
    fn test_blank_description_becomes_unknown() {
        let rows = vec![RawRow::new("2025-07-01", "   ", "1.00", "USD")];
        let statement = StatementAssembler::new().assemble(&HeaderHints::default(), &rows);
        assert_eq!(statement.transactions[0].description, "unknown");
    }
}
