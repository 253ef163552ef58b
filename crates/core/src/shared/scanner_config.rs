use std::time::Duration;

use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CYCLE_INTERVAL, DEFAULT_HISTORY_CAP,
    DEFAULT_MAX_SAMPLES, DEFAULT_SAMPLE_STRIDE, DEFAULT_SCAN_HISTORY_CAP,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("confidence threshold must be strictly between 0 and 1, got {0}")]
    Threshold(f64),
    #[error("sample stride must be at least 1")]
    Stride,
    #[error("max samples must be at least 1")]
    MaxSamples,
    #[error("{name} history cap must be at least 1")]
    HistoryCap { name: &'static str },
    #[error("cycle interval must be non-zero")]
    Interval,
}

/// Tunables shared by the live detection loop and one-shot scans.
#[derive(Clone, Debug, PartialEq)]
pub struct ScannerConfig {
    pub confidence_threshold: f64,
    pub sample_stride: usize,
    pub max_samples: usize,
    pub history_cap: usize,
    pub scan_history_cap: usize,
    pub cycle_interval: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            max_samples: DEFAULT_MAX_SAMPLES,
            history_cap: DEFAULT_HISTORY_CAP,
            scan_history_cap: DEFAULT_SCAN_HISTORY_CAP,
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
        }
    }
}

impl ScannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.confidence_threshold;
        if !(t > 0.0 && t < 1.0) {
            return Err(ConfigError::Threshold(t));
        }
        if self.sample_stride == 0 {
            return Err(ConfigError::Stride);
        }
        if self.max_samples == 0 {
            return Err(ConfigError::MaxSamples);
        }
        if self.history_cap == 0 {
            return Err(ConfigError::HistoryCap { name: "detection" });
        }
        if self.scan_history_cap == 0 {
            return Err(ConfigError::HistoryCap { name: "scan" });
        }
        if self.cycle_interval.is_zero() {
            return Err(ConfigError::Interval);
        }
        Ok(())
    }
}
