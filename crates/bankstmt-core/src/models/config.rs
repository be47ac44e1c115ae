//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StatementError};

/// Main configuration for the bankstmt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Text extraction cascade configuration.
    pub extraction: ExtractionConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Text field parsing configuration.
    pub parsing: ParsingConfig,
}

/// Text extraction cascade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum whitespace-collapsed text length for a stage to be accepted.
    pub min_text_yield: usize,

    /// Maximum pages to run through OCR (0 = unlimited).
    pub max_pages: usize,

    /// Try the empty password on encrypted PDFs.
    pub decrypt_empty_password: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_yield: 50,
            max_pages: 10,
            decrypt_empty_password: true,
        }
    }
}

/// OCR model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` glyph markers in recognized text instead of blanking them.
    pub keep_unknown_glyphs: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unknown_glyphs: false,
        }
    }
}

impl OcrConfig {
    /// Full paths of the detection model, recognition model and dictionary.
    pub fn model_paths(&self) -> (PathBuf, PathBuf, PathBuf) {
        (
            self.model_dir.join(&self.detection_model),
            self.model_dir.join(&self.recognition_model),
            self.model_dir.join(&self.dictionary),
        )
    }
}

/// Text field parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Number of leading lines searched for the bank name.
    pub bank_name_window: usize,

    /// Number of leading lines searched when inferring the statement date.
    pub statement_date_window: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            bank_name_window: 8,
            statement_date_window: 15,
        }
    }
}

impl StatementConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| StatementError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StatementError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: StatementConfig =
            serde_json::from_str(r#"{ "extraction": { "min_text_yield": 80 } }"#).unwrap();
        assert_eq!(config.extraction.min_text_yield, 80);
        assert_eq!(config.extraction.max_pages, 10);
        assert_eq!(config.parsing.bank_name_window, 8);
        assert_eq!(config.ocr.recognition_model, "latin_rec.onnx");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StatementConfig::default();
        config.extraction.max_pages = 3;
        config.save(&path).unwrap();

        let loaded = StatementConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.max_pages, 3);
        assert_eq!(loaded.parsing.statement_date_window, 15);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = StatementConfig::from_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(StatementError::Io(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = StatementConfig::from_file(&broken).unwrap_err();
        assert!(matches!(err, StatementError::Config(_)));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_model_paths() {
        let config = OcrConfig {
            model_dir: PathBuf::from("/opt/models"),
            ..OcrConfig::default()
        };
        let (det, rec, dict) = config.model_paths();
        assert_eq!(det, PathBuf::from("/opt/models/det.onnx"));
        assert_eq!(rec, PathBuf::from("/opt/models/latin_rec.onnx"));
        assert_eq!(dict, PathBuf::from("/opt/models/latin_dict.txt"));
    }
}
