use chrono::{DateTime, Utc};

use crate::classification::domain::classification_result::ClassificationResult;
use crate::shared::frame::Frame;

/// Maps a frame to at most one labeled result.
///
/// Returning `None` means nothing cleared the threshold this time; it is a
/// normal outcome, not a failure. Implementations may keep state (e.g. a
/// random source), hence `&mut self`.
pub trait FrameClassifier: Send {
    fn classify(
        &mut self,
        frame: &Frame,
        threshold: f64,
        at: DateTime<Utc>,
    ) -> Option<ClassificationResult>;
}
