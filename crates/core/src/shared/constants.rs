use std::time::Duration;

/// Minimum confidence a top category needs before it is reported.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Read every Nth pixel when building a frame signature.
pub const DEFAULT_SAMPLE_STRIDE: usize = 10;

/// Upper bound on pixels read per classification; the stride widens to stay under it.
pub const DEFAULT_MAX_SAMPLES: usize = 250_000;

/// Live detections kept, most recent first.
pub const DEFAULT_HISTORY_CAP: usize = 10;

/// Photo scans kept, most recent first.
pub const DEFAULT_SCAN_HISTORY_CAP: usize = 5;

/// Target spacing between detection cycles (~30 per second).
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_millis(33);

/// JPEG quality used when a still is handed to the results display.
pub const STILL_JPEG_QUALITY: u8 = 90;

/// Overlay box size as a fraction of the frame's width and height.
pub const OVERLAY_BOX_FRACTION: f64 = 0.6;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const APP_DIR_NAME: &str = "WasteSort";
