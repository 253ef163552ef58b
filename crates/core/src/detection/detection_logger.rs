use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for detection-loop events.
///
/// The loop reports stage timings and per-result metrics here so the CLI
/// can print a run summary without the loop knowing about stdout.
pub trait DetectionLogger: Send {
    /// A cycle finished; `count` is the number of cycles run so far.
    fn cycle(&mut self, count: usize);

    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

pub struct NullDetectionLogger;

impl DetectionLogger for NullDetectionLogger {
    fn cycle(&mut self, _count: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl Aggregate {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates timings and metrics over a run and logs a summary at the end.
///
/// Cycle progress goes to `log::debug!` every `throttle_cycles` cycles.
pub struct SummaryDetectionLogger {
    throttle_cycles: usize,
    timings: BTreeMap<String, Aggregate>,
    metrics: BTreeMap<String, Aggregate>,
    start_time: Instant,
    cycles: usize,
}

impl SummaryDetectionLogger {
    pub fn new(throttle_cycles: usize) -> Self {
        Self {
            throttle_cycles: throttle_cycles.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            cycles: 0,
        }
    }

    pub fn timing_for(&self, stage: &str) -> Option<Aggregate> {
        self.timings.get(stage).copied()
    }

    pub fn metric_for(&self, name: &str) -> Option<Aggregate> {
        self.metrics.get(name).copied()
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// `None` until at least one cycle has run.
    pub fn summary_string(&self) -> Option<String> {
        if self.cycles == 0 {
            return None;
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Detection summary ({} cycles in {elapsed:.1}s):",
            self.cycles
        )];

        for (stage, agg) in &self.timings {
            lines.push(format!(
                "  {stage:10}: avg {:6.2}ms  max {:6.2}ms",
                agg.mean(),
                agg.max
            ));
        }
        for (name, agg) in &self.metrics {
            lines.push(format!("  {name}: n={} avg {:.3}", agg.count, agg.mean()));
        }
        if elapsed > 0.0 {
            lines.push(format!(
                "  Cycle rate: {:.1}/s",
                self.cycles as f64 / elapsed
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for SummaryDetectionLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl DetectionLogger for SummaryDetectionLogger {
    fn cycle(&mut self, count: usize) {
        self.cycles = count;
        if count % self.throttle_cycles == 0 {
            log::debug!("Detection cycle {count}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .add(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().add(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
