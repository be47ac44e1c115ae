//! The three extraction stages: embedded text, page content streams, OCR.

use tracing::debug;

use super::cascade::TextStage;
use crate::error::Result;
use crate::models::statement::ExtractionStrategy;
use crate::ocr::{EngineLease, RecognizerFactory};
use crate::pdf::PageSource;

/// Separator placed between the text of consecutive pages.
const PAGE_BREAK: &str = "\n\n";

/// Reads the document's embedded text layer in one pass.
pub struct DirectTextStage;

impl TextStage for DirectTextStage {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::DirectText
    }

    fn extract(&self, source: &dyn PageSource) -> Result<String> {
        Ok(source.direct_text()?)
    }
}

/// Decodes each page's content stream separately. A page that fails to
/// decode is skipped; the stage fails only when no page decodes.
pub struct ContentStreamStage;

impl TextStage for ContentStreamStage {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::ContentStream
    }

    fn extract(&self, source: &dyn PageSource) -> Result<String> {
        let page_count = source.page_count()?;

        let mut pages = Vec::new();
        let mut first_error = None;
        for page in 1..=page_count {
            match source.page_text(page) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    debug!("Skipping page {}: {}", page, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if pages.is_empty() => Err(e.into()),
            _ => Ok(pages.join(PAGE_BREAK)),
        }
    }
}

/// Recognizes the images on each page with an engine acquired for this
/// attempt only.
pub struct OcrStage {
    factory: Box<dyn RecognizerFactory>,
    max_pages: usize,
}

impl OcrStage {
    /// `max_pages == 0` means every page.
    pub fn new(factory: impl RecognizerFactory + 'static, max_pages: usize) -> Self {
        Self {
            factory: Box::new(factory),
            max_pages,
        }
    }
}

impl TextStage for OcrStage {
    fn strategy(&self) -> ExtractionStrategy {
        ExtractionStrategy::Ocr
    }

    fn extract(&self, source: &dyn PageSource) -> Result<String> {
        // Released when the lease drops, on every return path below.
        let mut lease = EngineLease::acquire(self.factory.as_ref())?;

        let page_count = source.page_count()?;
        let limit = match self.max_pages {
            0 => page_count,
            max => page_count.min(max as u32),
        };
        if limit < page_count {
            debug!("OCR limited to {} of {} pages", limit, page_count);
        }

        let mut pages = Vec::new();
        for page in 1..=limit {
            let images = source.page_images(page)?;
            debug!("Page {}: {} images", page, images.len());

            let mut page_lines = Vec::new();
            for image in &images {
                let text = lease.read_text(image)?;
                if !text.trim().is_empty() {
                    page_lines.push(text);
                }
            }
            if !page_lines.is_empty() {
                pages.push(page_lines.join("\n"));
            }
        }

        Ok(pages.join(PAGE_BREAK))
    }
}
