//! Service Settings
//!
//! Layered from `config/default.toml`, an optional `config/local.toml` and
//! `TANK_`-prefixed environment variables (nested keys separated by `__`,
//! e.g. `TANK_SERVER__ADDR=0.0.0.0:9000`).

use alerting::AlertPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use storage::DEFAULT_MAX_RECORDS;
use tank_monitor::MonitorConfig;
use thresholds::{ThresholdPatch, ThresholdSpec};

use crate::rate_limit::RateLimitConfig;

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub max_records: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

/// Complete service settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub history: HistorySettings,
    pub alerts: AlertPolicy,
    pub rate_limit: RateLimitConfig,
    /// Overrides merged into the built-in threshold table
    pub thresholds: ThresholdPatch,
}

impl Settings {
    /// Load from `./config` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load from the given config directory and the environment
    pub fn load_from(dir: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(File::with_name(&format!("{}/local", dir)).required(false))
            .add_source(
                Environment::with_prefix("TANK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Monitor configuration derived from these settings
    pub fn monitor_config(&self) -> MonitorConfig {
        let mut thresholds = ThresholdSpec::default();
        thresholds.merge(&self.thresholds);

        MonitorConfig {
            thresholds,
            policy: self.alerts.clone(),
            history_max_records: self.history.max_records,
        }
    }
}
