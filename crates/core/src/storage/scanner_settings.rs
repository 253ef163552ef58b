use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::domain::facing::Facing;
use crate::scan::scan_photo_use_case::ScanHistory;
use crate::shared::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CYCLE_INTERVAL, DEFAULT_HISTORY_CAP,
};
use crate::shared::history::History;
use crate::shared::scanner_config::{ConfigError, ScannerConfig};
use crate::storage::domain::key_value_store::{load_json, save_json, KeyValueStore, StoreError};

const SETTINGS_KEY: &str = "scanner_settings";
const SCAN_HISTORY_KEY: &str = "scan_history";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// User preferences that persist between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Threshold as a whole percentage, 1..=99.
    pub confidence: u32,
    pub facing: Facing,
    pub flash: bool,
    pub history_cap: usize,
    pub interval_ms: u64,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            confidence: (DEFAULT_CONFIDENCE_THRESHOLD * 100.0).round() as u32,
            facing: Facing::default(),
            flash: false,
            history_cap: DEFAULT_HISTORY_CAP,
            interval_ms: DEFAULT_CYCLE_INTERVAL.as_millis() as u64,
        }
    }
}

impl ScannerSettings {
    /// Falls back to defaults when nothing is stored or the entry is unreadable.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json(store, SETTINGS_KEY) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), SettingsError> {
        self.to_config()?;
        save_json(store, SETTINGS_KEY, self)?;
        Ok(())
    }

    /// Applies these settings over the defaults and validates the result.
    pub fn to_config(&self) -> Result<ScannerConfig, ConfigError> {
        let config = ScannerConfig {
            confidence_threshold: self.confidence as f64 / 100.0,
            history_cap: self.history_cap,
            cycle_interval: Duration::from_millis(self.interval_ms),
            ..ScannerConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn load_scan_history(store: &dyn KeyValueStore, cap: usize) -> ScanHistory {
    match load_json::<ScanHistory>(store, SCAN_HISTORY_KEY) {
        Ok(Some(history)) => History::from_newest_first(cap, history.iter().cloned()),
        Ok(None) => History::new(cap),
        Err(e) => {
            log::warn!("Discarding unreadable scan history: {e}");
            History::new(cap)
        }
    }
}

pub fn save_scan_history(
    store: &mut dyn KeyValueStore,
    history: &ScanHistory,
) -> Result<(), StoreError> {
    save_json(store, SCAN_HISTORY_KEY, history)
}
