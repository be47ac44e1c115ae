//! Ordered fallback over text extraction stages.

use tracing::{info, warn};

use crate::error::{ExtractionError, Result};
use crate::models::statement::ExtractionStrategy;
use crate::pdf::PageSource;

/// Default minimum whitespace-collapsed text length for a stage to win.
pub const DEFAULT_MIN_YIELD: usize = 50;

/// One way of turning a document into text.
pub trait TextStage {
    /// Which strategy this stage implements.
    fn strategy(&self) -> ExtractionStrategy;

    /// Extract the document text. Returning little or no text is not an
    /// error; errors are reserved for stage faults.
    fn extract(&self, source: &dyn PageSource) -> Result<String>;
}

/// Text chosen by the cascade plus the notes gathered on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub text: String,
    pub strategy: ExtractionStrategy,
    pub warnings: Vec<String>,
}

/// Runs stages in order and stops at the first one with enough text.
pub struct TextCascade {
    stages: Vec<Box<dyn TextStage>>,
    min_yield: usize,
}

impl TextCascade {
    /// An empty cascade accepting text of at least `min_yield` characters.
    pub fn new(min_yield: usize) -> Self {
        Self {
            stages: Vec::new(),
            min_yield,
        }
    }

    /// Append a stage.
    pub fn with_stage(mut self, stage: impl TextStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Strategies in the order they will be tried.
    pub fn strategies(&self) -> Vec<ExtractionStrategy> {
        self.stages.iter().map(|s| s.strategy()).collect()
    }

    /// Run the cascade.
    ///
    /// When no stage reaches the yield threshold, the last non-blank text is
    /// returned with an extra warning. Only when every stage came back empty
    /// or failed does this return [`ExtractionError::Exhausted`].
    pub fn run(&self, source: &dyn PageSource) -> Result<CascadeOutcome> {
        if self.stages.is_empty() {
            return Err(ExtractionError::NoStages.into());
        }

        let mut warnings = Vec::new();
        let mut fallback: Option<(String, ExtractionStrategy)> = None;

        for stage in &self.stages {
            let strategy = stage.strategy();
            match stage.extract(source) {
                Ok(text) => {
                    let text_yield = collapsed_len(&text);
                    if text_yield >= self.min_yield {
                        info!("{} extraction accepted ({} chars)", strategy, text_yield);
                        return Ok(CascadeOutcome {
                            text,
                            strategy,
                            warnings,
                        });
                    }

                    warn!(
                        "{} extraction yielded {} chars, below {}",
                        strategy, text_yield, self.min_yield
                    );
                    warnings.push(format!(
                        "{}: low text yield ({} < {} characters)",
                        strategy, text_yield, self.min_yield
                    ));
                    if text_yield > 0 {
                        fallback = Some((text, strategy));
                    }
                }
                Err(e) => {
                    warn!("{} extraction failed: {}", strategy, e);
                    warnings.push(format!("{}: {}", strategy, e));
                }
            }
        }

        match fallback {
            Some((text, strategy)) => {
                warnings.push(format!(
                    "no extraction stage reached {} characters; using {} text, likely low quality or a scanned document",
                    self.min_yield, strategy
                ));
                Ok(CascadeOutcome {
                    text,
                    strategy,
                    warnings,
                })
            }
            None => Err(ExtractionError::Exhausted { warnings }.into()),
        }
    }
}

/// Length of `text` with whitespace runs collapsed and ends trimmed.
pub fn collapsed_len(text: &str) -> usize {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0;
    }
    words.iter().map(|w| w.chars().count()).sum::<usize>() + words.len() - 1
}
