//! PDF access for the text extraction cascade.

mod document;

pub use document::PdfDocument;

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// The views of a document that extraction stages read from.
pub trait PageSource {
    /// Text of the whole document read from its embedded text layer.
    fn direct_text(&self) -> Result<String>;

    /// Number of pages in the document.
    fn page_count(&self) -> Result<u32>;

    /// Text decoded from a single page's content stream (1-indexed).
    fn page_text(&self, page: u32) -> Result<String>;

    /// Raster images placed on a single page (1-indexed).
    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>>;
}
