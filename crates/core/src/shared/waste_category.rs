use serde::{Deserialize, Serialize};

/// The three labels the scanner can produce, in score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
    Wet,
    Dry,
    Recyclable,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 3] = [
        WasteCategory::Wet,
        WasteCategory::Dry,
        WasteCategory::Recyclable,
    ];

    pub fn index(self) -> usize {
        match self {
            WasteCategory::Wet => 0,
            WasteCategory::Dry => 1,
            WasteCategory::Recyclable => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            WasteCategory::Wet => "Wet Waste",
            WasteCategory::Dry => "Dry Waste",
            WasteCategory::Recyclable => "Recyclable",
        }
    }

    /// Hex color used for the overlay and result badges.
    pub fn color(self) -> &'static str {
        match self {
            WasteCategory::Wet => "#ef4444",
            WasteCategory::Dry => "#f59e0b",
            WasteCategory::Recyclable => "#10b981",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WasteCategory::Wet => "Organic waste, food scraps",
            WasteCategory::Dry => "Non-recyclable dry waste",
            WasteCategory::Recyclable => "Plastic, paper, metal, glass",
        }
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
