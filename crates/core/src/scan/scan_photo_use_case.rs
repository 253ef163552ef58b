use std::path::PathBuf;

use crate::capture::capture_controller::CaptureController;
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::still_image::StillImage;
use crate::classification::domain::frame_classifier::FrameClassifier;
use crate::scan::domain::photo_enhancer::PhotoEnhancement;
use crate::scan::domain::scan_record::{ScanOutcome, ScanRecord};
use crate::scan::domain::still_image_writer::StillImageWriter;
use crate::shared::clock::Clock;
use crate::shared::frame::Frame;
use crate::shared::history::History;
use crate::shared::scanner_config::ScannerConfig;

pub type ScanHistory = History<ScanRecord>;

struct StillArchive {
    writer: Box<dyn StillImageWriter>,
    dir: PathBuf,
}

/// Takes a single photo (or an uploaded image), classifies it once and
/// records it in the scan history.
pub struct ScanPhotoUseCase {
    classifier: Box<dyn FrameClassifier>,
    clock: Box<dyn Clock>,
    enhancement: PhotoEnhancement,
    threshold: f64,
    history: ScanHistory,
    archive: Option<StillArchive>,
}

impl ScanPhotoUseCase {
    pub fn new(
        classifier: Box<dyn FrameClassifier>,
        clock: Box<dyn Clock>,
        config: &ScannerConfig,
    ) -> Self {
        Self {
            classifier,
            clock,
            enhancement: PhotoEnhancement::default(),
            threshold: config.confidence_threshold,
            history: History::new(config.scan_history_cap),
            archive: None,
        }
    }

    pub fn with_enhancement(mut self, enhancement: PhotoEnhancement) -> Self {
        self.enhancement = enhancement;
        self
    }

    /// Saves every scanned still as `scan-<id>.jpg` under `dir`.
    pub fn with_archive(mut self, writer: Box<dyn StillImageWriter>, dir: PathBuf) -> Self {
        self.archive = Some(StillArchive { writer, dir });
        self
    }

    /// Replaces the history, e.g. with one loaded from storage.
    pub fn with_history(mut self, history: ScanHistory) -> Self {
        let cap = self.history.cap();
        self.history = History::from_newest_first(cap, history.iter().cloned());
        self
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }

    /// Captures the current frame, stops the camera, then enhances and
    /// classifies the still.
    ///
    /// Fails with `NotActive`/`NotReady` without touching the session.
    pub fn scan_camera(&mut self, capture: &mut CaptureController) -> Result<ScanOutcome, CaptureError> {
        let still = capture.capture_photo()?;
        capture.stop();
        let enhancement = self.enhancement;
        let still = still.map_frame(|frame| enhancement.apply(&frame));
        Ok(self.record(still))
    }

    /// Classifies an uploaded image. Any running camera session is stopped.
    pub fn scan_upload(&mut self, capture: &mut CaptureController, frame: Frame) -> ScanOutcome {
        capture.stop();
        self.record(StillImage::from_upload(frame))
    }

    fn record(&mut self, still: StillImage) -> ScanOutcome {
        let captured_at = self.clock.now();
        let result = self
            .classifier
            .classify(still.frame(), self.threshold, captured_at);
        let id = captured_at.timestamp_millis();

        let image_path = self.archive.as_ref().and_then(|archive| {
            let path = archive.dir.join(format!("scan-{id}.jpg"));
            match archive.writer.write(&path, still.frame()) {
                Ok(()) => Some(path),
                Err(e) => {
                    log::warn!("Failed to save scan to {}: {e}", path.display());
                    None
                }
            }
        });

        match &result {
            Some(r) => log::info!("Scan {id}: {}", r.label()),
            None => log::info!("Scan {id}: no category above {:.2}", self.threshold),
        }

        self.history.push(ScanRecord {
            id,
            captured_at,
            facing: still.facing(),
            result: result.clone(),
            image_path,
        });

        ScanOutcome {
            still,
            result,
            captured_at,
        }
    }
}
