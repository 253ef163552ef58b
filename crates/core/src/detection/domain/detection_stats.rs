use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classification::domain::classification_result::ClassificationResult;
use crate::shared::waste_category::WasteCategory;

/// Running totals over the results of one detection run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DetectionStats {
    total: usize,
    per_category: [usize; 3],
    /// Results per second, from the gap between the last two results.
    rate: f64,
    last_at: Option<DateTime<Utc>>,
}

impl DetectionStats {
    pub fn record(&mut self, result: &ClassificationResult) {
        self.total += 1;
        self.per_category[result.category().index()] += 1;

        let at = result.timestamp();
        if let Some(prev) = self.last_at {
            let gap_ms = (at - prev).num_milliseconds();
            if gap_ms > 0 {
                self.rate = 1000.0 / gap_ms as f64;
            }
        }
        self.last_at = Some(at);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, category: WasteCategory) -> usize {
        self.per_category[category.index()]
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn last_at(&self) -> Option<DateTime<Utc>> {
        self.last_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn result(category: WasteCategory, ms: i64) -> ClassificationResult {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap();
        ClassificationResult::new(category, 0.9, at)
    }

    #[test]
    fn test_counts_per_category() {
        let mut stats = DetectionStats::default();
        stats.record(&result(WasteCategory::Wet, 0));
        stats.record(&result(WasteCategory::Wet, 10));
        stats.record(&result(WasteCategory::Recyclable, 20));
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.count(WasteCategory::Wet), 2);
        assert_eq!(stats.count(WasteCategory::Dry), 0);
        assert_eq!(stats.count(WasteCategory::Recyclable), 1);
    }

    #[test]
    fn test_rate_from_last_gap() {
        let mut stats = DetectionStats::default();
        stats.record(&result(WasteCategory::Dry, 0));
        assert_eq!(stats.rate(), 0.0);
        stats.record(&result(WasteCategory::Dry, 250));
        assert_relative_eq!(stats.rate(), 4.0);
        stats.record(&result(WasteCategory::Dry, 350));
        assert_relative_eq!(stats.rate(), 10.0);
    }

    #[test]
    fn test_same_instant_keeps_previous_rate() {
        let mut stats = DetectionStats::default();
        stats.record(&result(WasteCategory::Dry, 0));
        stats.record(&result(WasteCategory::Dry, 500));
        stats.record(&result(WasteCategory::Dry, 500));
        assert_relative_eq!(stats.rate(), 2.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stats = DetectionStats::default();
        stats.record(&result(WasteCategory::Wet, 0));
        stats.reset();
        assert_eq!(stats, DetectionStats::default());
    }
}
