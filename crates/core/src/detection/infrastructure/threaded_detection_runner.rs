use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::capture::capture_controller::CaptureController;
use crate::classification::domain::classification_result::ClassificationResult;
use crate::detection::detection_loop::DetectionLoop;
use crate::detection::detection_runner::{DetectionRunner, RunSummary, StopHandle};
use crate::detection::domain::detection_sink::DetectionSink;
use crate::detection::domain::detection_stats::DetectionStats;
use crate::detection::domain::overlay::Overlay;

pub enum DetectionMessage {
    Detected {
        result: ClassificationResult,
        stats: DetectionStats,
        overlay: Overlay,
    },
    Cleared,
    Finished(RunSummary),
}

struct ChannelSink {
    tx: Sender<DetectionMessage>,
}

impl DetectionSink for ChannelSink {
    fn on_detection(
        &mut self,
        result: &ClassificationResult,
        stats: &DetectionStats,
        overlay: &Overlay,
    ) {
        let _ = self.tx.send(DetectionMessage::Detected {
            result: result.clone(),
            stats: stats.clone(),
            overlay: overlay.clone(),
        });
    }

    fn on_clear(&mut self) {
        let _ = self.tx.send(DetectionMessage::Cleared);
    }
}

type WorkerOutput = (CaptureController, DetectionLoop);

/// Detection running on its own thread. Results arrive on `messages`.
///
/// Dropping the worker stops the run and waits for the camera to be released.
pub struct DetectionWorker {
    messages: Receiver<DetectionMessage>,
    stop: StopHandle,
    handle: Option<JoinHandle<WorkerOutput>>,
}

/// Moves the controller and loop onto a worker thread and starts the runner.
pub fn spawn(
    mut capture: CaptureController,
    mut detection: DetectionLoop,
    runner: DetectionRunner,
) -> DetectionWorker {
    let (tx, rx) = crossbeam_channel::unbounded::<DetectionMessage>();
    let stop = StopHandle::new();
    let stop_worker = stop.clone();

    let handle = thread::spawn(move || {
        let mut sink = ChannelSink { tx: tx.clone() };
        let summary = runner.run(&mut capture, &mut detection, &mut sink, &stop_worker);
        let _ = tx.send(DetectionMessage::Finished(summary));
        (capture, detection)
    });

    DetectionWorker {
        messages: rx,
        stop,
        handle: Some(handle),
    }
}

impl DetectionWorker {
    pub fn messages(&self) -> &Receiver<DetectionMessage> {
        &self.messages
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    /// Waits for the run to end and hands back the controller and loop.
    pub fn join(mut self) -> Result<WorkerOutput, Box<dyn std::error::Error>> {
        let handle = self
            .handle
            .take()
            .ok_or("Detection thread already joined")?;
        handle.join().map_err(|_| "Detection thread panicked".into())
    }
}

impl Drop for DetectionWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.stop.request_stop();
            if handle.join().is_err() {
                log::warn!("Detection thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::capture_state::CaptureState;
    use crate::capture::domain::facing::Facing;
    use crate::capture::infrastructure::memory_source::MemorySource;
    use crate::detection::detection_logger::NullDetectionLogger;
    use crate::detection::detection_loop::ScriptedClassifier;
    use crate::shared::clock::SteppingClock;
    use crate::shared::frame::Frame;
    use crate::shared::scanner_config::ScannerConfig;
    use crate::shared::waste_category::WasteCategory;
    use std::time::Duration;

    fn start(script: Vec<Option<(WasteCategory, f64)>>, runner: DetectionRunner) -> (DetectionWorker, crate::capture::infrastructure::memory_source::AcquisitionLog) {
        let source = MemorySource::new()
            .with_clip(Facing::User, vec![Frame::solid(10, 10, [0, 0, 0], 0)]);
        let log = source.log();
        let mut capture = CaptureController::new(Box::new(source));
        capture.start(Facing::User).unwrap();
        let detection = DetectionLoop::new(
            Box::new(ScriptedClassifier::new(script)),
            Box::new(SteppingClock::new(33)),
            &ScannerConfig::default(),
            Box::new(NullDetectionLogger),
        );
        (spawn(capture, detection, runner), log)
    }

    #[test]
    fn test_messages_in_cycle_order() {
        let runner = DetectionRunner::new(Duration::from_millis(1)).with_max_cycles(3);
        let (worker, log) = start(
            vec![
                Some((WasteCategory::Wet, 0.9)),
                None,
                Some((WasteCategory::Dry, 0.6)),
            ],
            runner,
        );

        let received: Vec<_> = worker.messages().iter().take(4).collect();
        let (capture, detection) = worker.join().unwrap();

        assert!(matches!(
            &received[0],
            DetectionMessage::Detected { result, .. } if result.category() == WasteCategory::Wet
        ));
        assert!(matches!(received[1], DetectionMessage::Cleared));
        assert!(matches!(
            &received[2],
            DetectionMessage::Detected { stats, .. } if stats.total() == 2
        ));
        assert!(matches!(
            received[3],
            DetectionMessage::Finished(RunSummary { cycles: 3, detections: 2, .. })
        ));
        assert_eq!(capture.state(), CaptureState::Stopped);
        assert_eq!(detection.history().len(), 2);
        assert_eq!(log.held(), 0);
    }

    #[test]
    fn test_request_stop_ends_worker() {
        let runner = DetectionRunner::new(Duration::from_millis(2));
        let (worker, log) = start(vec![None; 1000], runner);

        worker.request_stop();
        let (capture, _) = worker.join().unwrap();

        assert!(!capture.is_active());
        assert_eq!(log.held(), 0);
    }

    #[test]
    fn test_dropping_worker_releases_camera() {
        let runner = DetectionRunner::new(Duration::from_millis(1));
        let (worker, log) = start(vec![None; 1000], runner);
        assert_eq!(log.acquires(), 1);

        drop(worker);

        assert_eq!(log.releases(), 1);
        assert_eq!(log.held(), 0);
    }
}
