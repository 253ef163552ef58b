use chrono::{DateTime, Utc};

use crate::classification::domain::category_scores::CategoryScores;
use crate::classification::domain::classification_result::ClassificationResult;
use crate::classification::domain::frame_classifier::FrameClassifier;
use crate::classification::domain::frame_signature::{Channel, FrameSignature};
use crate::classification::domain::score_jitter::ScoreJitter;
use crate::shared::frame::Frame;
use crate::shared::scanner_config::ScannerConfig;
use crate::shared::waste_category::WasteCategory;

/// Placeholder classifier driven by average color and brightness.
///
/// This is NOT a trained model. The rules below are arbitrary boundaries
/// chosen for a demo and carry no real signal about what is in front of the
/// camera:
///
/// | category   | fires when                                        | base | spread |
/// |------------|---------------------------------------------------|------|--------|
/// | wet        | green dominant, or `r > 100 && g > 80`            | 0.6  | 0.4    |
/// | dry        | `brightness > 150 && abs(r - g) < 30`             | 0.5  | 0.4    |
/// | recyclable | `brightness > 120 && (blue dominant \|\| b > 120)` | 0.7  | 0.4    |
///
/// A firing rule scores `base + jitter * spread`; the three scores are then
/// normalized to sum to 1 and the top one is reported when it exceeds the
/// threshold.
pub struct ColorHeuristic {
    stride: usize,
    max_samples: usize,
    jitter: Box<dyn ScoreJitter>,
}

impl ColorHeuristic {
    pub fn new(stride: usize, max_samples: usize, jitter: Box<dyn ScoreJitter>) -> Self {
        Self {
            stride: stride.max(1),
            max_samples: max_samples.max(1),
            jitter,
        }
    }

    pub fn from_config(config: &ScannerConfig, jitter: Box<dyn ScoreJitter>) -> Self {
        Self::new(config.sample_stride, config.max_samples, jitter)
    }

    /// Unnormalized rule scores for a signature.
    pub fn raw_scores(&mut self, sig: &FrameSignature) -> CategoryScores {
        let mut scores = [0.0; 3];

        if sig.dominant == Channel::Green || (sig.mean_r > 100.0 && sig.mean_g > 80.0) {
            scores[WasteCategory::Wet.index()] = 0.6 + self.jitter.next() * 0.4;
        }
        if sig.brightness > 150.0 && (sig.mean_r - sig.mean_g).abs() < 30.0 {
            scores[WasteCategory::Dry.index()] = 0.5 + self.jitter.next() * 0.4;
        }
        if sig.brightness > 120.0 && (sig.dominant == Channel::Blue || sig.mean_b > 120.0) {
            scores[WasteCategory::Recyclable.index()] = 0.7 + self.jitter.next() * 0.4;
        }

        CategoryScores::new(scores)
    }

    /// Normalized scores for a frame, or `None` if the frame is empty.
    pub fn scores(&mut self, frame: &Frame) -> Option<CategoryScores> {
        let sig = FrameSignature::sample(frame, self.stride, self.max_samples)?;
        Some(self.raw_scores(&sig).normalized())
    }
}

impl FrameClassifier for ColorHeuristic {
    fn classify(
        &mut self,
        frame: &Frame,
        threshold: f64,
        at: DateTime<Utc>,
    ) -> Option<ClassificationResult> {
        let (category, confidence) = self.scores(frame)?.best();
        (confidence > threshold).then(|| ClassificationResult::new(category, confidence, at))
    }
}
