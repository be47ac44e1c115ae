//! Entry point that routes a document to the tabular or text path.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Result, StatementError};
use crate::extract::{TextCascade, standard_cascade};
use crate::models::config::StatementConfig;
use crate::models::statement::{HeaderHints, ProcessedStatement, RawRow};
use crate::pdf::{PageSource, PdfDocument};
use crate::statement::{PdfFieldExtractor, StatementAssembler};
use crate::tabular::{TabularRowClassifier, read_workbook};

/// The kinds of document the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Csv,
    Xlsx,
    Pdf,
    Unknown,
}

impl DocumentKind {
    /// Map a file extension (without the dot, any case).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "csv" | "txt" => DocumentKind::Csv,
            "xlsx" | "xls" | "ods" => DocumentKind::Xlsx,
            "pdf" => DocumentKind::Pdf,
            _ => DocumentKind::Unknown,
        }
    }

    /// Kind of the file at `path`, from its extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(DocumentKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Csv => "csv",
            DocumentKind::Xlsx => "xlsx",
            DocumentKind::Pdf => "pdf",
            DocumentKind::Unknown => "unknown",
        }
    }
}

/// Turns documents into normalized statements.
pub struct StatementProcessor {
    config: StatementConfig,
    cascade: TextCascade,
    fields: PdfFieldExtractor,
    classifier: TabularRowClassifier,
    assembler: StatementAssembler,
}

impl StatementProcessor {
    /// A processor with the standard extraction cascade.
    pub fn new(config: StatementConfig) -> Self {
        Self {
            cascade: standard_cascade(&config),
            fields: PdfFieldExtractor::from_config(&config.parsing),
            classifier: TabularRowClassifier::new(),
            assembler: StatementAssembler::new(),
            config,
        }
    }

    /// Replace the text extraction cascade.
    pub fn with_cascade(mut self, cascade: TextCascade) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn config(&self) -> &StatementConfig {
        &self.config
    }

    /// Process a document of a known kind.
    pub fn process(&self, bytes: &[u8], kind: DocumentKind) -> Result<ProcessedStatement> {
        let start = Instant::now();
        info!("Processing {} document ({} bytes)", kind.as_str(), bytes.len());

        let processed = match kind {
            DocumentKind::Csv => {
                let rows = self.classifier.classify_bytes(bytes)?;
                self.assemble_rows(&rows)
            }
            DocumentKind::Xlsx => {
                let records = read_workbook(bytes)?;
                let rows = self.classifier.classify(&records);
                self.assemble_rows(&rows)
            }
            DocumentKind::Pdf => {
                let document = PdfDocument::new(bytes)
                    .with_empty_password(self.config.extraction.decrypt_empty_password);
                self.process_source(&document)?
            }
            DocumentKind::Unknown => {
                return Err(StatementError::UnsupportedFormat(
                    "cannot determine document kind".to_string(),
                ));
            }
        };

        info!(
            "Processed {} transactions in {}ms (doc_point {})",
            processed.statement.footer.num_transactions,
            start.elapsed().as_millis(),
            processed.statement.footer.doc_point
        );
        Ok(processed)
    }

    /// Run the text path on any page source.
    pub fn process_source(&self, source: &dyn PageSource) -> Result<ProcessedStatement> {
        let outcome = self.cascade.run(source)?;
        debug!(
            "Cascade chose {} with {} warnings",
            outcome.strategy,
            outcome.warnings.len()
        );

        let mut processed = self.process_text(&outcome.text);
        processed.warnings = outcome.warnings;
        processed.strategy = Some(outcome.strategy);
        Ok(processed)
    }

    /// Build a statement from already-extracted text.
    pub fn process_text(&self, text: &str) -> ProcessedStatement {
        let fields = self.fields.extract(text);
        ProcessedStatement {
            statement: self.assembler.assemble(&fields.hints, &fields.rows),
            warnings: Vec::new(),
            strategy: None,
        }
    }

    fn assemble_rows(&self, rows: &[RawRow]) -> ProcessedStatement {
        ProcessedStatement {
            statement: self.assembler.assemble(&HeaderHints::default(), rows),
            warnings: Vec::new(),
            strategy: None,
        }
    }
}

impl Default for StatementProcessor {
    fn default() -> Self {
        Self::new(StatementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ContentStreamStage, DEFAULT_MIN_YIELD, DirectTextStage};
    use crate::extract::testing::FakeSource;
    use crate::models::statement::ExtractionStrategy;

    fn text_only() -> StatementProcessor {
        StatementProcessor::default().with_cascade(
            TextCascade::new(DEFAULT_MIN_YIELD)
                .with_stage(DirectTextStage)
                .with_stage(ContentStreamStage),
        )
    }

    #[test]
    fn test_document_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("CSV"), DocumentKind::Csv);
        assert_eq!(DocumentKind::from_extension("txt"), DocumentKind::Csv);
        assert_eq!(DocumentKind::from_extension("ods"), DocumentKind::Xlsx);
        assert_eq!(DocumentKind::from_extension("pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension("docx"), DocumentKind::Unknown);
        assert_eq!(
            DocumentKind::from_path(Path::new("/tmp/july.statement.PDF")),
            DocumentKind::Pdf
        );
        assert_eq!(DocumentKind::from_path(Path::new("README")), DocumentKind::Unknown);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = StatementProcessor::default()
            .process(b"2025-07-01,Coffee,-3.50", DocumentKind::Unknown)
            .unwrap_err();
        assert!(matches!(err, StatementError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_csv_path() {
        let csv = b"Date,Description,Amount,Currency\n2025-07-01,Salary,1500.00,USD\n2025-07-02,Coffee,-3.50,USD\n";
        let processed = StatementProcessor::default()
            .process(csv, DocumentKind::Csv)
            .unwrap();
        assert_eq!(processed.strategy, None);
        assert!(processed.warnings.is_empty());
        assert_eq!(processed.statement.header.currency, "USD");
        assert_eq!(processed.statement.footer.total_amount_parsed, "1496.50");
        assert_eq!(processed.statement.header.bank, "unknown");
    }

    #[test]
    fn test_text_path_carries_strategy_and_warnings() {
        let text = "Sample Bank\nCurrency: USD\nOpening Balance: 10.00\n2025-07-01  Coffee  -3.50\nClosing Balance: 6.50\n";
        let source = FakeSource {
            direct: Some("x".to_string()),
            pages: vec![text.to_string()],
            ..Default::default()
        };

        let processed = text_only().process_source(&source).unwrap();
        assert_eq!(processed.strategy, Some(ExtractionStrategy::ContentStream));
        assert_eq!(processed.warnings.len(), 1);
        assert_eq!(processed.statement.header.bank, "Sample Bank");
        assert_eq!(processed.statement.transactions.len(), 1);
        assert!(processed.statement.footer.balanced);
    }

    #[test]
    fn test_unreadable_pdf_is_an_extraction_error() {
        let err = text_only()
            .process(b"%PDF-1.4 truncated", DocumentKind::Pdf)
            .unwrap_err();
        assert!(matches!(err, StatementError::Extraction(_)));
    }
}
