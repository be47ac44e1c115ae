//! Core library for bank statement normalization.
//!
//! This crate provides:
//! - Field normalization (dates, amounts, currencies, identifiers)
//! - Confidence scoring for rows, headers and whole documents
//! - CSV and spreadsheet ingestion with header detection
//! - PDF text extraction with content-stream and OCR fallbacks
//! - Statement assembly with balance reconciliation

pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pdf;
pub mod processor;
pub mod scoring;
pub mod statement;
pub mod tabular;

pub use error::{Result, StatementError};
pub use extract::{CascadeOutcome, TextCascade, TextStage, standard_cascade};
pub use models::config::StatementConfig;
pub use models::statement::{
    ExtractionStrategy, Footer, Header, HeaderHints, ProcessedStatement, RawRow, Statement,
    Transaction,
};
pub use pdf::{PageSource, PdfDocument};
pub use processor::{DocumentKind, StatementProcessor};
pub use statement::{PdfFieldExtractor, StatementAssembler};
pub use tabular::TabularRowClassifier;
