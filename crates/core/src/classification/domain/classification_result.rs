use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::waste_category::WasteCategory;

/// A labeled guess for one frame. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    category: WasteCategory,
    confidence: f64,
    color: String,
    timestamp: DateTime<Utc>,
}

impl ClassificationResult {
    pub fn new(category: WasteCategory, confidence: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            category,
            confidence: confidence.clamp(0.0, 1.0),
            color: category.color().to_string(),
            timestamp,
        }
    }

    pub fn category(&self) -> WasteCategory {
        self.category
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// e.g. `Recyclable (87.3%)`
    pub fn label(&self) -> String {
        format!("{} ({:.1}%)", self.category.name(), self.confidence * 100.0)
    }
}
