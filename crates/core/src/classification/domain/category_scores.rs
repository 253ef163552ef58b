use crate::shared::waste_category::WasteCategory;

/// One score per [`WasteCategory`], indexed by `WasteCategory::index`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryScores([f64; 3]);

impl CategoryScores {
    pub fn new(scores: [f64; 3]) -> Self {
        Self(scores)
    }

    pub fn get(&self, category: WasteCategory) -> f64 {
        self.0[category.index()]
    }

    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Scales scores to sum to 1. All-zero scores are returned unchanged.
    pub fn normalized(&self) -> Self {
        let sum = self.sum();
        if sum > 0.0 {
            Self(self.0.map(|s| s / sum))
        } else {
            *self
        }
    }

    /// Highest-scoring category; the earliest category wins ties.
    pub fn best(&self) -> (WasteCategory, f64) {
        let mut best = (WasteCategory::Wet, self.0[0]);
        for category in WasteCategory::ALL.into_iter().skip(1) {
            let score = self.get(category);
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalized_sums_to_one() {
        let scores = CategoryScores::new([0.8, 0.7, 0.9]).normalized();
        assert_relative_eq!(scores.sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(scores.get(WasteCategory::Recyclable), 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_scores_stay_zero() {
        let scores = CategoryScores::default().normalized();
        assert_eq!(scores.as_array(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_best_picks_max() {
        let scores = CategoryScores::new([0.2, 0.5, 0.3]);
        assert_eq!(scores.best(), (WasteCategory::Dry, 0.5));
    }

    #[test]
    fn test_best_tie_prefers_first() {
        let scores = CategoryScores::new([0.5, 0.5, 0.0]);
        assert_eq!(scores.best().0, WasteCategory::Wet);
    }
}
