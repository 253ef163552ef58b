use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::domain::facing::Facing;
use crate::capture::domain::still_image::StillImage;
use crate::classification::domain::classification_result::ClassificationResult;

/// One entry of the scan history.
///
/// Pixels are not kept here; `image_path` points at the saved still when
/// an archive directory is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: i64,
    pub captured_at: DateTime<Utc>,
    /// `None` for uploaded files.
    pub facing: Option<Facing>,
    pub result: Option<ClassificationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
}

impl ScanRecord {
    pub fn is_upload(&self) -> bool {
        self.facing.is_none()
    }
}

/// What a scan hands to the results display.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub still: StillImage,
    pub result: Option<ClassificationResult>,
    pub captured_at: DateTime<Utc>,
}
