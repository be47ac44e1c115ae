//! Recognition engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::{OcrError, Result};
use crate::models::config::OcrConfig;

use super::{RecognizerFactory, TextBox, TextRecognizer};

/// Marker the recognizer emits for glyphs outside its dictionary.
const UNKNOWN_GLYPH: &str = "[UNK]";

/// A loaded `pure-onnx-ocr` engine.
pub struct PureOcrEngine {
    engine: Option<pure_onnx_ocr::engine::OcrEngine>,
    keep_unknown_glyphs: bool,
}

impl PureOcrEngine {
    /// Load detection and recognition models named by `config`.
    pub fn load(config: &OcrConfig) -> std::result::Result<Self, OcrError> {
        let (det_path, rec_path, dict_path) = config.model_paths();

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Some(engine),
            keep_unknown_glyphs: config.keep_unknown_glyphs,
        })
    }
}

impl TextRecognizer for PureOcrEngine {
    fn recognize(&mut self, image: &DynamicImage) -> Result<Vec<TextBox>> {
        let engine = self.engine.as_ref().ok_or(OcrError::Released)?;
        let (width, height) = image.dimensions();
        debug!("Recognizing image: {}x{}", width, height);

        let results = engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        Ok(results
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: if self.keep_unknown_glyphs {
                    r.text.clone()
                } else {
                    r.text.replace(UNKNOWN_GLYPH, " ")
                },
                confidence: r.confidence,
            })
            .collect())
    }

    fn release(&mut self) {
        if self.engine.take().is_some() {
            debug!("Dropped pure-onnx-ocr engine");
        }
    }
}

/// Builds a fresh [`PureOcrEngine`] for every OCR attempt.
pub struct PureOcrFactory {
    config: OcrConfig,
}

impl PureOcrFactory {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

impl RecognizerFactory for PureOcrFactory {
    fn acquire(&self) -> Result<Box<dyn TextRecognizer>> {
        Ok(Box::new(PureOcrEngine::load(&self.config)?))
    }
}

/// First four exterior points of a polygon as `[x1, y1, .. x4, y4]`.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
