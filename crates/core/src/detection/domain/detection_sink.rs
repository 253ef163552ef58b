use crate::classification::domain::classification_result::ClassificationResult;
use crate::detection::domain::detection_stats::DetectionStats;
use crate::detection::domain::overlay::Overlay;

/// Receives the output of each detection cycle (the overlay renderer).
pub trait DetectionSink: Send {
    fn on_detection(&mut self, result: &ClassificationResult, stats: &DetectionStats, overlay: &Overlay);

    /// Nothing to show this cycle; clear any previous overlay.
    fn on_clear(&mut self);
}

/// Discards everything.
pub struct NullDetectionSink;

impl DetectionSink for NullDetectionSink {
    fn on_detection(&mut self, _: &ClassificationResult, _: &DetectionStats, _: &Overlay) {}
    fn on_clear(&mut self) {}
}
