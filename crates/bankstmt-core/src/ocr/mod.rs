//! Optical character recognition for scanned statement pages.
//!
//! Recognition engines are heavy, so the extraction cascade acquires one per
//! attempt through a [`RecognizerFactory`] and holds it in an [`EngineLease`],
//! which releases the engine when the attempt ends, however it ends.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::{PureOcrEngine, PureOcrFactory};

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Vertical band, in pixels, within which boxes count as one line.
const LINE_BAND: f32 = 20.0;

/// A recognized text box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Quadrilateral corners `(x1, y1, .. x4, y4)`.
    pub bbox: [f32; 8],

    /// Recognized text.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Axis-aligned bounding rectangle `(min_x, min_y, max_x, max_y)`.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }

    fn line_band(&self) -> i32 {
        let (_, min_y, _, _) = self.rect();
        (min_y / LINE_BAND) as i32
    }
}

/// Sort boxes top-to-bottom, then left-to-right within a line.
pub fn sort_by_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        a.line_band().cmp(&b.line_band()).then_with(|| {
            let (ax, _, _, _) = a.rect();
            let (bx, _, _, _) = b.rect();
            ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
        })
    });
}

/// Lay recognized boxes out as text: one line per band, boxes on the same
/// line separated by two spaces so column gaps survive.
pub fn boxes_to_text(mut boxes: Vec<TextBox>) -> String {
    sort_by_reading_order(&mut boxes);

    let mut lines: Vec<String> = Vec::new();
    let mut current_band = None;
    for text_box in boxes {
        let text = text_box.text.trim();
        if text.is_empty() {
            continue;
        }
        let band = text_box.line_band();
        if current_band == Some(band) {
            if let Some(line) = lines.last_mut() {
                line.push_str("  ");
                line.push_str(text);
            }
        } else {
            lines.push(text.to_string());
            current_band = Some(band);
        }
    }

    lines.join("\n")
}

/// A loaded recognition engine.
pub trait TextRecognizer {
    /// Recognize the text boxes on one image.
    fn recognize(&mut self, image: &DynamicImage) -> Result<Vec<TextBox>>;

    /// Free the engine's resources. Called exactly once, by [`EngineLease`].
    fn release(&mut self);
}

/// Loads recognition engines on demand.
pub trait RecognizerFactory {
    fn acquire(&self) -> Result<Box<dyn TextRecognizer>>;
}

/// Scoped ownership of an acquired engine; releases it on drop.
pub struct EngineLease {
    engine: Box<dyn TextRecognizer>,
}

impl EngineLease {
    /// Acquire an engine from `factory`.
    pub fn acquire(factory: &dyn RecognizerFactory) -> Result<Self> {
        let engine = factory.acquire()?;
        debug!("Acquired recognition engine");
        Ok(Self { engine })
    }

    /// Recognize one image and lay its boxes out as text.
    pub fn read_text(&mut self, image: &DynamicImage) -> Result<String> {
        let boxes = self.engine.recognize(image)?;
        Ok(boxes_to_text(boxes))
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        self.engine.release();
        debug!("Released recognition engine");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::OcrError;

    /// Counts acquisitions and releases; fails recognition on a given call.
    #[derive(Clone, Default)]
    pub struct CountingFactory {
        pub acquired: Arc<AtomicUsize>,
        pub released: Arc<AtomicUsize>,
        pub fail_on_call: Option<usize>,
        pub lines: Vec<String>,
    }

    struct CountingRecognizer {
        released: Arc<AtomicUsize>,
        calls: usize,
        fail_on_call: Option<usize>,
        lines: Vec<String>,
    }

    impl CountingFactory {
        pub fn released(&self) -> usize {
            self.released.load(Ordering::SeqCst)
        }

        pub fn acquired(&self) -> usize {
            self.acquired.load(Ordering::SeqCst)
        }
    }

    impl RecognizerFactory for CountingFactory {
        fn acquire(&self) -> Result<Box<dyn TextRecognizer>> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingRecognizer {
                released: Arc::clone(&self.released),
                calls: 0,
                fail_on_call: self.fail_on_call,
                lines: self.lines.clone(),
            }))
        }
    }

    impl TextRecognizer for CountingRecognizer {
        fn recognize(&mut self, _image: &DynamicImage) -> Result<Vec<TextBox>> {
            self.calls += 1;
            if self.fail_on_call == Some(self.calls) {
                return Err(OcrError::Recognition("page unreadable".to_string()).into());
            }
            Ok(self
                .lines
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let y = i as f32 * 30.0;
                    TextBox {
                        bbox: [0.0, y, 100.0, y, 100.0, y + 10.0, 0.0, y + 10.0],
                        text: line.clone(),
                        confidence: 0.9,
                    }
                })
                .collect())
        }

        fn release(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}
