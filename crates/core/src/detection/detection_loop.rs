use std::time::Instant;

use crate::capture::capture_controller::CaptureController;
use crate::capture::domain::capture_error::CaptureError;
use crate::classification::domain::classification_result::ClassificationResult;
use crate::classification::domain::frame_classifier::FrameClassifier;
use crate::detection::detection_logger::DetectionLogger;
use crate::detection::domain::detection_sink::DetectionSink;
use crate::detection::domain::detection_stats::DetectionStats;
use crate::detection::domain::overlay::Overlay;
use crate::shared::clock::Clock;
use crate::shared::history::History;
use crate::shared::scanner_config::{ConfigError, ScannerConfig};

pub type DetectionHistory = History<ClassificationResult>;

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Detected(ClassificationResult),
    /// A frame was read but nothing cleared the threshold.
    Nothing,
    /// The feed is active but has not produced a frame yet.
    NotReady,
    /// Capture is no longer active; the loop must end.
    Halted,
}

/// One capture-classify-publish step, run repeatedly by a runner.
pub struct DetectionLoop {
    classifier: Box<dyn FrameClassifier>,
    clock: Box<dyn Clock>,
    threshold: f64,
    history: DetectionHistory,
    stats: DetectionStats,
    logger: Box<dyn DetectionLogger>,
    cycles: usize,
}

impl DetectionLoop {
    pub fn new(
        classifier: Box<dyn FrameClassifier>,
        clock: Box<dyn Clock>,
        config: &ScannerConfig,
        logger: Box<dyn DetectionLogger>,
    ) -> Self {
        Self {
            classifier,
            clock,
            threshold: config.confidence_threshold,
            history: History::new(config.history_cap),
            stats: DetectionStats::default(),
            logger,
            cycles: 0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Changes the threshold for subsequent cycles.
    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ConfigError::Threshold(threshold));
        }
        self.threshold = threshold;
        Ok(())
    }

    pub fn history(&self) -> &DetectionHistory {
        &self.history
    }

    pub fn stats(&self) -> &DetectionStats {
        &self.stats
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Clears history and stats; called when a run (re)starts.
    pub fn reset(&mut self) {
        self.history.clear();
        self.stats.reset();
        self.cycles = 0;
    }

    pub fn run_cycle(
        &mut self,
        capture: &CaptureController,
        sink: &mut dyn DetectionSink,
    ) -> CycleOutcome {
        let t0 = Instant::now();
        let frame = match capture.current_frame() {
            Ok(frame) => frame,
            Err(CaptureError::NotReady) => {
                self.finish_cycle();
                sink.on_clear();
                return CycleOutcome::NotReady;
            }
            Err(e) => {
                log::debug!("Detection halted: {e}");
                return CycleOutcome::Halted;
            }
        };
        self.logger
            .timing("capture", t0.elapsed().as_secs_f64() * 1000.0);

        let at = self.clock.now();
        let t1 = Instant::now();
        let result = self.classifier.classify(&frame, self.threshold, at);
        self.logger
            .timing("classify", t1.elapsed().as_secs_f64() * 1000.0);
        self.finish_cycle();

        match result {
            Some(result) => {
                self.history.push(result.clone());
                self.stats.record(&result);
                self.logger.metric("confidence", result.confidence());

                let overlay = Overlay::for_result(&result, frame.width(), frame.height());
                sink.on_detection(&result, &self.stats, &overlay);
                CycleOutcome::Detected(result)
            }
            None => {
                sink.on_clear();
                CycleOutcome::Nothing
            }
        }
    }

    /// Emits the logger's run summary.
    pub fn finish(&mut self) {
        self.logger.info(&format!(
            "Detection stopped after {} cycles, {} results",
            self.cycles,
            self.stats.total()
        ));
        self.logger.summary();
    }

    fn finish_cycle(&mut self) {
        self.cycles += 1;
        self.logger.cycle(self.cycles);
    }
}

/// Replays a fixed script of outcomes, one per call, then returns `None`.
#[cfg(test)]
pub(crate) struct ScriptedClassifier {
    script: std::collections::VecDeque<Option<(crate::shared::waste_category::WasteCategory, f64)>>,
}

#[cfg(test)]
impl ScriptedClassifier {
    pub(crate) fn new(
        script: Vec<Option<(crate::shared::waste_category::WasteCategory, f64)>>,
    ) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[cfg(test)]
impl FrameClassifier for ScriptedClassifier {
    fn classify(
        &mut self,
        _frame: &crate::shared::frame::Frame,
        threshold: f64,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Option<ClassificationResult> {
        let (category, confidence) = self.script.pop_front().flatten()?;
        (confidence > threshold).then(|| ClassificationResult::new(category, confidence, at))
    }
}

/// Sink that remembers everything it was given.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) detections: Vec<(ClassificationResult, DetectionStats, Overlay)>,
    pub(crate) clears: usize,
}

#[cfg(test)]
impl DetectionSink for RecordingSink {
    fn on_detection(
        &mut self,
        result: &ClassificationResult,
        stats: &DetectionStats,
        overlay: &Overlay,
    ) {
        self.detections
            .push((result.clone(), stats.clone(), overlay.clone()));
    }

    fn on_clear(&mut self) {
        self.clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::facing::Facing;
    use crate::capture::infrastructure::memory_source::MemorySource;
    use crate::classification::domain::color_heuristic::ColorHeuristic;
    use crate::classification::domain::score_jitter::MidpointJitter;
    use crate::detection::detection_logger::NullDetectionLogger;
    use crate::shared::clock::SteppingClock;
    use crate::shared::frame::Frame;
    use crate::shared::waste_category::WasteCategory;
    use approx::assert_relative_eq;

    fn active_controller(source: MemorySource) -> CaptureController {
        let mut controller = CaptureController::new(Box::new(source));
        controller.start(Facing::Environment).unwrap();
        controller
    }

    fn gray_clip() -> MemorySource {
        MemorySource::new().with_clip(Facing::Environment, vec![Frame::solid(40, 30, [90, 90, 90], 0)])
    }

    fn scripted(script: Vec<Option<(WasteCategory, f64)>>, history_cap: usize) -> DetectionLoop {
        let config = ScannerConfig {
            history_cap,
            ..ScannerConfig::default()
        };
        DetectionLoop::new(
            Box::new(ScriptedClassifier::new(script)),
            Box::new(SteppingClock::new(100)),
            &config,
            Box::new(NullDetectionLogger),
        )
    }

    #[test]
    fn test_five_cycles_three_results() {
        let controller = active_controller(gray_clip());
        let mut detection = scripted(
            vec![
                Some((WasteCategory::Wet, 0.8)),
                None,
                Some((WasteCategory::Recyclable, 0.9)),
                Some((WasteCategory::Dry, 0.3)),
                Some((WasteCategory::Wet, 0.7)),
            ],
            10,
        );
        let mut sink = RecordingSink::default();

        for _ in 0..5 {
            detection.run_cycle(&controller, &mut sink);
        }

        assert_eq!(detection.cycles(), 5);
        assert_eq!(detection.stats().total(), 3);
        assert_eq!(detection.stats().count(WasteCategory::Wet), 2);
        assert_eq!(detection.stats().count(WasteCategory::Recyclable), 1);
        assert_eq!(detection.history().len(), 3);
        assert_eq!(
            detection.history().latest().unwrap().category(),
            WasteCategory::Wet
        );
        assert_eq!(sink.detections.len(), 3);
        assert_eq!(sink.clears, 2);
    }

    #[test]
    fn test_history_keeps_newest_up_to_cap() {
        let controller = active_controller(gray_clip());
        let script = (0..5)
            .map(|i| Some((WasteCategory::from_index(i % 3).unwrap(), 0.9)))
            .collect();
        let mut detection = scripted(script, 2);
        let mut sink = RecordingSink::default();
        for _ in 0..5 {
            detection.run_cycle(&controller, &mut sink);
        }

        let kept: Vec<_> = detection.history().iter().map(|r| r.category()).collect();
        assert_eq!(kept, vec![WasteCategory::Dry, WasteCategory::Wet]);
        assert_eq!(detection.stats().total(), 5);
    }

    #[test]
    fn test_overlay_matches_result() {
        let controller = active_controller(gray_clip());
        let mut detection = scripted(vec![Some((WasteCategory::Recyclable, 0.873))], 10);
        let mut sink = RecordingSink::default();

        let outcome = detection.run_cycle(&controller, &mut sink);
        assert!(matches!(outcome, CycleOutcome::Detected(_)));

        let (result, stats, overlay) = &sink.detections[0];
        assert_eq!(result.category(), WasteCategory::Recyclable);
        assert_eq!(stats.total(), 1);
        assert_eq!(overlay.label, "Recyclable (87.3%)");
        assert_relative_eq!(overlay.width, 24.0);
        assert_relative_eq!(overlay.x, 8.0);
    }

    #[test]
    fn test_not_ready_is_an_empty_cycle() {
        let controller = active_controller(gray_clip().with_warmup(1));
        let mut detection = scripted(vec![Some((WasteCategory::Wet, 0.9))], 10);
        let mut sink = RecordingSink::default();

        assert_eq!(detection.run_cycle(&controller, &mut sink), CycleOutcome::NotReady);
        assert!(matches!(
            detection.run_cycle(&controller, &mut sink),
            CycleOutcome::Detected(_)
        ));
        assert_eq!(sink.clears, 1);
        assert_eq!(detection.cycles(), 2);
    }

    #[test]
    fn test_inactive_capture_halts() {
        let mut controller = active_controller(gray_clip());
        controller.stop();
        let mut detection = scripted(vec![Some((WasteCategory::Wet, 0.9))], 10);
        let mut sink = RecordingSink::default();

        assert_eq!(detection.run_cycle(&controller, &mut sink), CycleOutcome::Halted);
        assert_eq!(detection.cycles(), 0);
        assert!(sink.detections.is_empty());
    }

    #[test]
    fn test_rate_follows_clock() {
        let controller = active_controller(gray_clip());
        let mut detection = scripted(
            vec![Some((WasteCategory::Wet, 0.9)), Some((WasteCategory::Wet, 0.9))],
            10,
        );
        let mut sink = RecordingSink::default();
        detection.run_cycle(&controller, &mut sink);
        detection.run_cycle(&controller, &mut sink);
        assert_relative_eq!(detection.stats().rate(), 10.0);
    }

    #[test]
    fn test_reset_clears_run_state() {
        let controller = active_controller(gray_clip());
        let mut detection = scripted(vec![Some((WasteCategory::Dry, 0.9))], 10);
        let mut sink = RecordingSink::default();
        detection.run_cycle(&controller, &mut sink);

        detection.reset();
        assert!(detection.history().is_empty());
        assert_eq!(detection.stats().total(), 0);
        assert_eq!(detection.cycles(), 0);
    }

    #[test]
    fn test_set_threshold_validates() {
        let mut detection = scripted(vec![], 10);
        assert!(detection.set_threshold(0.8).is_ok());
        assert_relative_eq!(detection.threshold(), 0.8);
        assert!(detection.set_threshold(1.0).is_err());
        assert!(detection.set_threshold(f64::NAN).is_err());
        assert_relative_eq!(detection.threshold(), 0.8);
    }

    #[test]
    fn test_heuristic_end_to_end() {
        let source = MemorySource::new()
            .with_clip(Facing::Environment, vec![Frame::solid(64, 48, [60, 140, 50], 0)]);
        let controller = active_controller(source);
        let mut detection = DetectionLoop::new(
            Box::new(ColorHeuristic::from_config(
                &ScannerConfig::default(),
                Box::new(MidpointJitter),
            )),
            Box::new(SteppingClock::new(33)),
            &ScannerConfig::default(),
            Box::new(NullDetectionLogger),
        );
        let mut sink = RecordingSink::default();

        match detection.run_cycle(&controller, &mut sink) {
            CycleOutcome::Detected(result) => {
                assert_eq!(result.category(), WasteCategory::Wet);
                assert_relative_eq!(result.confidence(), 1.0);
                assert_eq!(result.color(), "#ef4444");
            }
            other => panic!("expected a detection, got {other:?}"),
        }
    }
}
