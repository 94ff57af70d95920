//! Sensor and Alert Severity Levels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single reading, in ascending order of severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl SensorStatus {
    /// Most severe of a set of statuses; `Normal` when empty.
    pub fn worst<I: IntoIterator<Item = SensorStatus>>(statuses: I) -> SensorStatus {
        statuses.into_iter().max().unwrap_or_default()
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorStatus::Normal => write!(f, "normal"),
            SensorStatus::Warning => write!(f, "warning"),
            SensorStatus::Critical => write!(f, "critical"),
        }
    }
}

/// Severity carried by an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl AlertSeverity {
    /// Severity for a status, `None` for `Normal`
    pub fn from_status(status: SensorStatus) -> Option<Self> {
        match status {
            SensorStatus::Normal => None,
            SensorStatus::Warning => Some(AlertSeverity::Warning),
            SensorStatus::Critical => Some(AlertSeverity::Critical),
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warning" => Ok(AlertSeverity::Warning),
            "critical" => Ok(AlertSeverity::Critical),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}
