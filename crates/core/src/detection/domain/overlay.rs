use serde::Serialize;

use crate::classification::domain::classification_result::ClassificationResult;
use crate::shared::constants::OVERLAY_BOX_FRACTION;

/// What the renderer draws over the live preview for a result.
///
/// The heuristic has no localization, so the box is always centered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub color: String,
}

impl Overlay {
    pub fn for_result(result: &ClassificationResult, frame_width: u32, frame_height: u32) -> Self {
        let width = frame_width as f64 * OVERLAY_BOX_FRACTION;
        let height = frame_height as f64 * OVERLAY_BOX_FRACTION;
        Self {
            x: (frame_width as f64 - width) / 2.0,
            y: (frame_height as f64 - height) / 2.0,
            width,
            height,
            label: result.label(),
            color: result.color().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::waste_category::WasteCategory;
    use approx::assert_relative_eq;
    use chrono::DateTime;

    #[test]
    fn test_box_is_centered_at_sixty_percent() {
        let at = DateTime::from_timestamp(0, 0).unwrap();
        let result = ClassificationResult::new(WasteCategory::Wet, 0.75, at);
        let overlay = Overlay::for_result(&result, 1280, 720);
        assert_relative_eq!(overlay.width, 768.0);
        assert_relative_eq!(overlay.height, 432.0);
        assert_relative_eq!(overlay.x, 256.0);
        assert_relative_eq!(overlay.y, 144.0);
        assert_eq!(overlay.label, "Wet Waste (75.0%)");
        assert_eq!(overlay.color, "#ef4444");
    }
}
