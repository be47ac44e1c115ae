//! Document text extraction: a cascade of increasingly expensive stages.

mod cascade;
mod stages;

pub use cascade::{CascadeOutcome, DEFAULT_MIN_YIELD, TextCascade, TextStage, collapsed_len};
pub use stages::{ContentStreamStage, DirectTextStage, OcrStage};

use crate::models::config::StatementConfig;

/// The standard cascade: embedded text, then content streams, then OCR
/// when the `native` feature provides an engine.
pub fn standard_cascade(config: &StatementConfig) -> TextCascade {
    let cascade = TextCascade::new(config.extraction.min_text_yield)
        .with_stage(DirectTextStage)
        .with_stage(ContentStreamStage);

    #[cfg(feature = "native")]
    let cascade = cascade.with_stage(OcrStage::new(
        crate::ocr::PureOcrFactory::new(config.ocr.clone()),
        config.extraction.max_pages,
    ));

    cascade
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statement::ExtractionStrategy;

    #[test]
    fn test_standard_cascade_order() {
        let strategies = standard_cascade(&StatementConfig::default()).strategies();
        assert_eq!(&strategies[..2], &[
            ExtractionStrategy::DirectText,
            ExtractionStrategy::ContentStream,
        ]);
        #[cfg(feature = "native")]
        assert_eq!(strategies[2], ExtractionStrategy::Ocr);
    }
}
