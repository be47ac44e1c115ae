//! Error types for the bankstmt-core library.

use thiserror::Error;

/// Main error type for the bankstmt library.
#[derive(Error, Debug)]
pub enum StatementError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Text extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Delimited or spreadsheet ingestion error.
    #[error("tabular error: {0}")]
    Tabular(#[from] TabularError),

    /// The detected document kind is not one we can ingest.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug, Clone)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The engine was used after it had been released.
    #[error("recognition engine already released")]
    Released,
}

/// Errors raised by the text extraction cascade.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Every stage failed without producing any text.
    #[error("all extraction stages failed: {}", .warnings.join("; "))]
    Exhausted { warnings: Vec<String> },

    /// The cascade was built without any stages.
    #[error("no extraction stages configured")]
    NoStages,
}

/// Errors raised while reading delimited text or spreadsheets.
#[derive(Error, Debug)]
pub enum TabularError {
    /// Delimited text could not be read.
    #[error("failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be opened or read.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// Workbook has no worksheet to read.
    #[error("spreadsheet has no worksheets")]
    NoWorksheet,
}

/// Result type for the bankstmt library.
pub type Result<T> = std::result::Result<T, StatementError>;
