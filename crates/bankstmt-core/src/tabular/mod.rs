//! Tabular ingestion: delimited text and spreadsheets.

pub mod classifier;
pub mod spreadsheet;

pub use classifier::{TabularRowClassifier, read_delimited, sniff_delimiter};
pub use spreadsheet::read_workbook;
