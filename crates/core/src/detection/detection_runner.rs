use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::capture::capture_controller::CaptureController;
use crate::detection::detection_loop::{CycleOutcome, DetectionLoop};
use crate::detection::domain::detection_sink::DetectionSink;
use crate::shared::scanner_config::ScannerConfig;

/// Cross-thread stop request. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub detections: usize,
    pub stopped_by_request: bool,
}

/// Drives a [`DetectionLoop`] at a fixed cadence until capture stops.
///
/// Cycles never overlap: the next one starts only after the previous one
/// returned, and a slow cycle simply delays the next instead of queueing.
#[derive(Debug, Clone)]
pub struct DetectionRunner {
    interval: Duration,
    max_cycles: Option<usize>,
}

impl DetectionRunner {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_cycles: None,
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.cycle_interval)
    }

    /// Stop capture after `n` cycles.
    pub fn with_max_cycles(mut self, n: usize) -> Self {
        self.max_cycles = Some(n);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn run(
        &self,
        capture: &mut CaptureController,
        detection: &mut DetectionLoop,
        sink: &mut dyn DetectionSink,
        stop: &StopHandle,
    ) -> RunSummary {
        detection.reset();
        let mut summary = RunSummary::default();
        log::info!(
            "Detection started ({}ms interval, threshold {:.2})",
            self.interval.as_millis(),
            detection.threshold()
        );

        loop {
            if stop.is_requested() {
                summary.stopped_by_request = true;
                capture.stop();
            }
            if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                capture.stop();
            }

            let started = Instant::now();
            match detection.run_cycle(capture, sink) {
                CycleOutcome::Halted => break,
                CycleOutcome::Detected(_) => summary.detections += 1,
                CycleOutcome::Nothing | CycleOutcome::NotReady => {}
            }
            summary.cycles += 1;

            let elapsed = started.elapsed();
            match self.interval.checked_sub(elapsed) {
                Some(remaining) => thread::sleep(remaining),
                None => log::debug!(
                    "Cycle took {:.1}ms, longer than the interval",
                    elapsed.as_secs_f64() * 1000.0
                ),
            }
        }

        detection.finish();
        summary
    }
}
