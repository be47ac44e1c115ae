//! Common regex patterns and lookup tables for statement normalization.

use lazy_static::lazy_static;
use regex::Regex;

/// Currency symbols and codes recognised by exact lookup, in scan order.
pub const CURRENCY_TABLE: &[(&str, &str)] = &[
    ("$", "USD"),
    ("₱", "PHP"),
    ("€", "EUR"),
    ("¥", "JPY"),
    ("£", "GBP"),
    ("PHP", "PHP"),
    ("USD", "USD"),
];

/// Month abbreviations. `sept` is listed ahead of `sep` so the longer
/// prefix is tried first.
pub const MONTHS: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sept", 9),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Vocabulary that marks a line as a likely bank name.
pub const BANK_HINTS: &[&str] = &[
    "bank",
    "banco",
    "banque",
    "bancorp",
    "credit union",
    "savings",
    "trust",
    "financial",
    "bdo",
    "bpi",
    "metrobank",
    "landbank",
    "unionbank",
    "rcbc",
    "hsbc",
    "citibank",
    "chase",
    "wells fargo",
    "barclays",
    "santander",
];

lazy_static! {
    // Canonical shapes
    pub static ref MONEY: Regex = Regex::new(r"^-?\d+\.\d{2}$").unwrap();

    pub static ref ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    pub static ref ISO_CURRENCY: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();

    pub static ref CURRENCY_CODE: Regex = Regex::new(r"^[A-Za-z]{3}$").unwrap();

    // Date forms, tried in this order
    pub static ref DATE_YMD: Regex = Regex::new(
        r"^(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})(?:[Tt]|\b)"
    ).unwrap();

    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"^(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)^([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"(?i)^(\d{1,2})\s+([a-z]{3,9})\.?,?\s+(\d{4})\b"
    ).unwrap();

    /// Any date-shaped token inside free text.
    pub static ref DATE_TOKEN: Regex = Regex::new(concat!(
        r"(?i)\b(?:",
        r"\d{4}[/.\-]\d{1,2}[/.\-]\d{1,2}",
        r"|\d{1,2}[/.\-]\d{1,2}[/.\-](?:\d{4}|\d{2})",
        r"|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}",
        r"|\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+\d{4}",
        r")\b"
    )).unwrap();

    // Labeled header fields
    pub static ref ACCOUNT_NUMBER: Regex = Regex::new(
        r"(?i)\baccount\s*(?:number|no\.?|#)\s*[:#]\s*([A-Za-z0-9][A-Za-z0-9\-]*(?:[ \t][0-9][A-Za-z0-9\-]*)*)"
    ).unwrap();

    pub static ref CUSTOMER_NUMBER: Regex = Regex::new(
        r"(?i)\bcustomer\s+(?:account\s+)?(?:number|no\.?|id)\s*[:#]\s*([A-Za-z0-9][A-Za-z0-9\-]*(?:[ \t][0-9][A-Za-z0-9\-]*)*)"
    ).unwrap();

    pub static ref STATEMENT_DATE: Regex = Regex::new(
        r"(?i)\bstatement\s+date\s*:\s*([^\n]+)"
    ).unwrap();

    pub static ref OPENING_BALANCE: Regex = Regex::new(concat!(
        r"(?i)\b(?:opening|beginning)\s+balance\s*:\s*",
        r"(\(?[ \t]*-?[ \t]*(?:[a-z]{3}[ \t]*|[$₱€¥£][ \t]*)?-?[\d,]*\d(?:\.\d{1,2})?[ \t]*\)?)"
    )).unwrap();

    pub static ref CLOSING_BALANCE: Regex = Regex::new(concat!(
        r"(?i)\b(?:closing|ending)\s+balance\s*:\s*",
        r"(\(?[ \t]*-?[ \t]*(?:[a-z]{3}[ \t]*|[$₱€¥£][ \t]*)?-?[\d,]*\d(?:\.\d{1,2})?[ \t]*\)?)"
    )).unwrap();

    pub static ref CURRENCY_LABEL: Regex = Regex::new(
        r"(?i)\bcurrency\s*:\s*(\S+)"
    ).unwrap();

    /// Explicit currency token inside an amount field.
    pub static ref AMOUNT_CURRENCY_TOKEN: Regex = Regex::new(
        r"\b(PHP|USD|EUR|GBP|JPY|AUD|CAD|SGD|HKD|CNY|CHF|INR|NZD)\b|([$₱€¥£])"
    ).unwrap();

    // Transaction rows, in match priority order
    pub static ref ROW_ISO: Regex = Regex::new(&row_pattern(
        r"\d{4}[/.\-]\d{1,2}[/.\-]\d{1,2}"
    )).unwrap();

    pub static ref ROW_NUMERIC: Regex = Regex::new(&row_pattern(
        r"\d{1,2}[/.\-]\d{1,2}[/.\-](?:\d{4}|\d{2})"
    )).unwrap();

    pub static ref ROW_NAMED_MONTH: Regex = Regex::new(&row_pattern(
        r"[A-Za-z]{3,9}\.?\s+\d{1,2},?\s+\d{4}|\d{1,2}\s+[A-Za-z]{3,9}\.?,?\s+\d{4}"
    )).unwrap();
}

const ROW_CURRENCY_CODES: &str = "PHP|USD|EUR|GBP|JPY|AUD|CAD|SGD|HKD|CNY|CHF|INR|NZD";

/// Build a transaction row pattern around a date alternative:
/// `date  description  amount  [running balance]`.
fn row_pattern(date: &str) -> String {
    format!(
        concat!(
            r"^\s*(?P<date>{date})\s+(?P<description>.+?)\s+",
            r"(?P<amount>\(?-?(?:(?:{codes})[ \t]?|[$₱€¥£][ \t]?)?-?[\d,]*\d\.\d{{2}}\)?(?:[ \t]?(?:{codes}))?)",
            r"(?:[ \t]+(?P<balance>-?[\d,]*\d\.\d{{2}}))?\s*$"
        ),
        date = date,
        codes = ROW_CURRENCY_CODES,
    )
}
