//! Workbook ingestion via calamine.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Result, TabularError};
use crate::normalize::amounts::format_cents;

/// Read the first worksheet of an xlsx/xls/ods workbook into trimmed string
/// records. Fully empty rows are skipped.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| TabularError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TabularError::NoWorksheet)?
        .map_err(|e| TabularError::Spreadsheet(e.to_string()))?;

    let records: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|record| record.iter().any(|cell| !cell.is_empty()))
        .collect();

    debug!("Read {} records from first worksheet", records.len());
    Ok(records)
}

/// Render a cell the way it would appear in a CSV export.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Numeric cells carry money, so they render with two decimals like an
/// exported amount column. Values outside the decimal range keep their
/// float text.
fn float_text(f: f64) -> String {
    Decimal::from_f64_retain(f)
        .map(format_cents)
        .unwrap_or_else(|| f.to_string())
}
