//! Statement assembly from text or tabular sources.

mod assembler;
mod fields;

pub use assembler::{StatementAssembler, resolve_header_currency};
pub use fields::{ExtractedFields, PdfFieldExtractor, resolve_row_currency};
