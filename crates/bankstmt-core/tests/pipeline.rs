use bankstmt_core::{DocumentKind, StatementConfig, StatementError, StatementProcessor};
use pretty_assertions::assert_eq;

const TEXT_STATEMENT: &str = "\
FIRST METRO SAVINGS BANK
Statement of Account
Account No: 1234 5678 9012
Customer ID: CUST-0042
Statement Date: 07/31/2025
Currency: PHP
Beginning Balance: 5,000.00

Date         Description                    Amount        Balance
2025-07-03   Payroll ACME Inc               25,000.00     30,000.00
2025-07-05   ATM Withdrawal                 (2,000.00)    28,000.00
2025-07-09   Online Transfer USD            USD 100.00
2025-07-15   Electric bill                  -1,250.75     26,649.25

Ending Balance: 26,849.25
";

#[test]
fn test_text_statement_end_to_end() {
    let processor = StatementProcessor::new(StatementConfig::default());
    let statement = processor.process_text(TEXT_STATEMENT).statement;

    let header = &statement.header;
    assert_eq!(header.bank, "FIRST METRO SAVINGS BANK");
    assert_eq!(header.bank_account, "123456789012");
    assert_eq!(header.customer_account_number, "CUST0042");
    assert_eq!(header.statement_date, "2025-07-31");
    assert_eq!(header.currency, "PHP");
    assert_eq!(header.opening_balance, "5000.00");
    assert_eq!(header.closing_balance, "26849.25");

    let amounts: Vec<&str> = statement
        .transactions
        .iter()
        .map(|t| t.amount.as_str())
        .collect();
    assert_eq!(amounts, vec!["25000.00", "-2000.00", "100.00", "-1250.75"]);

    let currencies: Vec<&str> = statement
        .transactions
        .iter()
        .map(|t| t.currency.as_str())
        .collect();
    assert_eq!(currencies, vec!["PHP", "PHP", "USD", "PHP"]);

    assert_eq!(statement.footer.num_transactions, 4);
    assert_eq!(statement.footer.total_amount_parsed, "21849.25");
    assert!(statement.footer.balanced);
}

#[test]
fn test_semicolon_csv_with_debit_and_credit() {
    let csv = "\
Txn Date;Description;Debit;Credit;Ccy
31/07/2025;Salary;;1500.00;EUR
01/08/2025;Rent;800.00;;EUR
";
    let processed = StatementProcessor::default()
        .process(csv.as_bytes(), DocumentKind::Csv)
        .unwrap();
    let transactions = &processed.statement.transactions;
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].date, "2025-07-31");
    assert_eq!(transactions[0].amount, "1500.00");
    assert_eq!(transactions[1].amount, "-800.00");
    assert_eq!(transactions[0].currency, "EUR");
    assert_eq!(processed.statement.header.currency, "EUR");
}

#[test]
fn test_scores_are_five_decimal_strings() {
    let csv = "Date,Description,Amount\n2025-07-01,Coffee,-3.50\n,Orphan,1.00\n";
    let processed = StatementProcessor::default()
        .process(csv.as_bytes(), DocumentKind::Csv)
        .unwrap();

    let statement = processed.statement;
    let scores = statement
        .transactions
        .iter()
        .map(|t| t.row_point.as_str())
        .chain([statement.header.row_point.as_str(), statement.footer.doc_point.as_str()]);
    for score in scores {
        let (whole, fraction) = score.split_once('.').unwrap();
        assert!(whole == "0" || whole == "1", "{score}");
        assert_eq!(fraction.len(), 5, "{score}");
    }
    assert_eq!(statement.transactions[1].date, "unknown");
}

#[test]
fn test_json_envelope() {
    let csv = "Date,Description,Amount\n2025-07-01,Coffee,-3.50\n";
    let processed = StatementProcessor::default()
        .process(csv.as_bytes(), DocumentKind::Csv)
        .unwrap();

    let json = serde_json::to_value(&processed).unwrap();
    assert_eq!(json["transactions"][0]["amount"], "-3.50");
    assert_eq!(json["footer"]["num_transactions"], 1);
    assert!(json.get("strategy").is_none());
    assert!(json.get("warnings").is_none());
}

#[test]
fn test_unsupported_format() {
    let err = StatementProcessor::default()
        .process(b"anything", DocumentKind::Unknown)
        .unwrap_err();
    assert!(matches!(err, StatementError::UnsupportedFormat(_)));
}

#[test]
fn test_oversized_csv_amount_is_zeroed() {
    let csv = "Date,Description,Amount\n\
               2025-07-01,Wire,99999999999999999999999999999\n\
               2025-07-02,Coffee,-3.50\n";
    let processed = StatementProcessor::default()
        .process(csv.as_bytes(), DocumentKind::Csv)
        .unwrap();

    let statement = processed.statement;
    assert_eq!(statement.transactions[0].amount, "0.00");
    assert_eq!(statement.transactions[1].amount, "-3.50");
    assert_eq!(statement.footer.total_amount_parsed, "-3.50");
}

#[test]
fn test_latin1_csv_still_produces_a_statement() {
    let bytes = b"Date,Description,Amount\n2025-07-01,Caf\xE9 Rio,-3.50\n2025-07-02,Salary,1500.00\n";
    let processed = StatementProcessor::default()
        .process(bytes, DocumentKind::Csv)
        .unwrap();

    let transactions = &processed.statement.transactions;
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].description, "Caf\u{FFFD} Rio");
    assert_eq!(transactions[0].amount, "-3.50");
    assert_eq!(processed.statement.footer.total_amount_parsed, "1496.50");
}
