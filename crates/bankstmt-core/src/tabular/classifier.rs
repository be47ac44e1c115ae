//! Header-versus-headerless classification of tabular records.
//!
//! A CSV export may or may not start with a row of column names, and the
//! column names vary between banks. Both readings are built and scored on
//! how transaction-like their rows look; the better one wins.

use tracing::{debug, warn};

use crate::error::{Result, TabularError};
use crate::models::statement::RawRow;
use crate::normalize::{from_cents, is_iso_date, is_money, normalize_amount, to_cents};

const DATE_COLUMNS: &[&str] = &[
    "date",
    "transaction date",
    "posting date",
    "post date",
    "value date",
    "txn date",
    "trans date",
];

const DESCRIPTION_COLUMNS: &[&str] = &[
    "description",
    "details",
    "narrative",
    "particulars",
    "memo",
    "transaction details",
    "remarks",
];

const AMOUNT_COLUMNS: &[&str] = &["amount", "transaction amount", "value", "amt"];

const CURRENCY_COLUMNS: &[&str] = &["currency", "ccy", "currency code"];

const DEBIT_COLUMNS: &[&str] = &["debit", "debits", "withdrawal", "withdrawals", "debit amount"];

const CREDIT_COLUMNS: &[&str] = &["credit", "credits", "deposit", "deposits", "credit amount"];

/// Pick the field delimiter from the first line: `;` if present, else `,`.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    if first_line.contains(&b';') { b';' } else { b',' }
}

/// Read delimited text into trimmed records without assuming a header row.
///
/// Cells that are not valid UTF-8 (Latin-1 exports, mostly) are decoded
/// lossily instead of failing the document.
pub fn read_delimited(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let delimiter = sniff_delimiter(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut records = Vec::new();
    let mut lossy_cells = 0;
    for record in reader.byte_records() {
        let record = record.map_err(TabularError::from)?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        records.push(
            record
                .iter()
                .map(|cell| match std::str::from_utf8(cell) {
                    Ok(text) => text.to_string(),
                    Err(_) => {
                        lossy_cells += 1;
                        String::from_utf8_lossy(cell).into_owned()
                    }
                })
                .collect(),
        );
    }
    if lossy_cells > 0 {
        warn!("Replaced invalid UTF-8 in {} cells", lossy_cells);
    }

    debug!(
        "Read {} records with delimiter {:?}",
        records.len(),
        delimiter as char
    );
    Ok(records)
}

/// One interpretation of a set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub rows: Vec<RawRow>,
    pub score: u32,
    pub with_header: bool,
}

/// Column positions resolved from a header row.
#[derive(Debug, Default, Clone, Copy)]
struct Columns {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    currency: Option<usize>,
    debit: Option<usize>,
    credit: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Self {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|cell| names.contains(&cell.trim().to_lowercase().as_str()))
        };

        Self {
            date: find(DATE_COLUMNS),
            description: find(DESCRIPTION_COLUMNS),
            amount: find(AMOUNT_COLUMNS),
            currency: find(CURRENCY_COLUMNS),
            debit: find(DEBIT_COLUMNS),
            credit: find(CREDIT_COLUMNS),
        }
    }

    fn positional(width: usize) -> Self {
        Self {
            date: Some(0),
            description: Some(1),
            amount: Some(2),
            currency: (width > 3).then_some(3),
            debit: None,
            credit: None,
        }
    }

    fn extract(&self, record: &[String]) -> RawRow {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let amount = match self.amount {
            Some(_) => cell(self.amount),
            None => net_amount(&cell(self.debit), &cell(self.credit)),
        };

        RawRow {
            date: cell(self.date),
            description: cell(self.description),
            amount,
            currency: cell(self.currency),
        }
    }
}

/// Credit minus debit, for exports that split money in and out. The debit
/// is taken as a magnitude whatever its printed sign.
fn net_amount(debit: &str, credit: &str) -> String {
    if debit.is_empty() && credit.is_empty() {
        return String::new();
    }
    let debit_cents = to_cents(&normalize_amount(debit)).abs();
    let credit_cents = to_cents(&normalize_amount(credit));
    from_cents(i128::from(credit_cents) - i128::from(debit_cents))
}

/// Chooses between the header and headerless readings of tabular records.
pub struct TabularRowClassifier;

impl TabularRowClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify delimited text.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Vec<RawRow>> {
        let records = read_delimited(bytes)?;
        Ok(self.classify(&records))
    }

    /// Classify already-split records and return the winning rows.
    pub fn classify(&self, records: &[Vec<String>]) -> Vec<RawRow> {
        let with_header = self.read_with_header(records);
        let headerless = self.read_headerless(records);

        debug!(
            "Header reading: {} rows, score {}; headerless reading: {} rows, score {}",
            with_header.rows.len(),
            with_header.score,
            headerless.rows.len(),
            headerless.score
        );

        pick(with_header, headerless).rows
    }

    /// Treat the first record as column names.
    pub fn read_with_header(&self, records: &[Vec<String>]) -> Reading {
        let Some((header, body)) = records.split_first() else {
            return Reading::empty(true);
        };
        let columns = Columns::from_header(header);
        Reading::build(body, &columns, true)
    }

    /// Read columns positionally, dropping a leading header-like record.
    pub fn read_headerless(&self, records: &[Vec<String>]) -> Reading {
        let body = match records.first() {
            Some(first) if is_header_like(first) => &records[1..],
            _ => records,
        };
        let width = body.iter().map(Vec::len).max().unwrap_or(0);
        Reading::build(body, &Columns::positional(width), false)
    }
}

impl Default for TabularRowClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Reading {
    fn empty(with_header: bool) -> Self {
        Self {
            rows: Vec::new(),
            score: 0,
            with_header,
        }
    }

    fn build(records: &[Vec<String>], columns: &Columns, with_header: bool) -> Self {
        let rows: Vec<RawRow> = records
            .iter()
            .map(|record| columns.extract(record))
            .filter(|row| !row.description.is_empty())
            .collect();
        let score = rows.iter().map(score_row).sum();

        Self {
            rows,
            score,
            with_header,
        }
    }
}

/// Higher score, then more rows, then the header reading.
fn pick(with_header: Reading, headerless: Reading) -> Reading {
    let header_key = (with_header.score, with_header.rows.len());
    let headerless_key = (headerless.score, headerless.rows.len());
    if headerless_key > header_key {
        headerless
    } else {
        with_header
    }
}

/// A record reads as column names when it mentions a date, a description
/// and some kind of amount.
pub fn is_header_like(record: &[String]) -> bool {
    let joined = record.join(",").to_lowercase();
    joined.contains("date")
        && (joined.contains("description") || joined.contains("details"))
        && (joined.contains("amount") || joined.contains("debit") || joined.contains("credit"))
}

/// How transaction-like a raw row looks.
fn score_row(row: &RawRow) -> u32 {
    let mut score = 0;
    if is_iso_date(&row.date) || row.date.chars().any(|c| c.is_ascii_digit()) {
        score += 2;
    }
    if is_money(row.amount.trim()) {
        score += 1;
    }
    if row.description.chars().any(char::is_alphabetic) {
        score += 1;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(text: &str) -> Vec<Vec<String>> {
        read_delimited(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(b"date;description;amount\n1;2;3"), b';');
        assert_eq!(sniff_delimiter(b"date,description,amount\n1;2;3"), b',');
        assert_eq!(sniff_delimiter(b""), b',');
    }

    #[test]
    fn test_read_delimited_trims_and_skips_blank_lines() {
        let recs = records("a , b,c\n\n d,e\n");
        assert_eq!(recs, vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string()],
        ]);
    }

    #[test]
    fn test_read_delimited_decodes_latin1_lossily() {
        let bytes = b"Date,Description,Amount\n2025-07-01,Caf\xE9 Rio,-3.50\n";
        let records = read_delimited(bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1][1], "Caf\u{FFFD} Rio");

        let rows = TabularRowClassifier::new().classify_bytes(bytes).unwrap();
        assert_eq!(rows, vec![RawRow::new("2025-07-01", "Caf\u{FFFD} Rio", "-3.50", "")]);
    }

    #[test]
    fn test_header_reading_beats_misaligned_headerless() {
        let recs = records(concat!(
            "Value Date,Narrative,Ref,Amount\n",
            "2025-07-01,Salary,R1,1500.00\n",
            "2025-07-02,Coffee,R2,-3.50\n",
            "2025-07-03,Rent,R3,-800.00\n",
            "2025-07-04,Refund,R4,12.00\n",
        ));
        let classifier = TabularRowClassifier::new();

        let with_header = classifier.read_with_header(&recs);
        let headerless = classifier.read_headerless(&recs);
        assert_eq!(with_header.score, 16);
        assert_eq!(headerless.score, 13);

        let rows = classifier.classify(&recs);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], RawRow::new("2025-07-02", "Coffee", "-3.50", ""));
    }

    #[test]
    fn test_headerless_export() {
        let recs = records(concat!(
            "07/01/2025,Salary,1500.00,USD\n",
            "07/02/2025,Coffee,-3.50,USD\n",
        ));
        let rows = TabularRowClassifier::new().classify(&recs);
        assert_eq!(rows, vec![
            RawRow::new("07/01/2025", "Salary", "1500.00", "USD"),
            RawRow::new("07/02/2025", "Coffee", "-3.50", "USD"),
        ]);
    }

    #[test]
    fn test_header_like_first_record_is_dropped_positionally() {
        let recs = records(concat!(
            "Date,Description,Amount\n",
            "2025-07-01,Salary,1500.00\n",
        ));
        let classifier = TabularRowClassifier::new();
        let headerless = classifier.read_headerless(&recs);
        assert_eq!(headerless.rows.len(), 1);

        // equal score and row count: the header reading is kept
        let with_header = classifier.read_with_header(&recs);
        assert_eq!(with_header.score, headerless.score);
        assert!(pick(with_header, headerless).with_header);
    }

    #[test]
    fn test_semicolon_input() {
        let rows = TabularRowClassifier::new()
            .classify_bytes(b"Posting Date;Details;Amount;Ccy\n2025-07-01;Fee;-1.00;EUR\n")
            .unwrap();
        assert_eq!(rows, vec![RawRow::new("2025-07-01", "Fee", "-1.00", "EUR")]);
    }

    #[test]
    fn test_debit_credit_columns() {
        let rows = TabularRowClassifier::new()
            .classify_bytes(concat!(
                "Date,Description,Debit,Credit\n",
                "2025-07-01,Salary,,1500.00\n",
                "2025-07-02,Coffee,3.50,\n",
            ).as_bytes())
            .unwrap();
        assert_eq!(rows[0].amount, "1500.00");
        assert_eq!(rows[1].amount, "-3.50");
    }

    #[test]
    fn test_rows_without_description_are_dropped() {
        let recs = records("Date,Description,Amount\n2025-07-01,,1.00\n2025-07-02,Tea,2.00\n");
        let rows = TabularRowClassifier::new().classify(&recs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Tea");
    }

    #[test]
    fn test_empty_input() {
        let rows = TabularRowClassifier::new().classify_bytes(b"").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_is_header_like() {
        let row = |s: &str| s.split(',').map(String::from).collect::<Vec<_>>();
        assert!(is_header_like(&row("Txn Date,Details,Credit")));
        assert!(!is_header_like(&row("Value Date,Narrative,Ref,Amount")));
    }
}
