//! Tank Record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sensor::SensorSnapshot;

/// Latest known state of one tank. Replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankRecord {
    /// Empty when the document did not carry one
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Production stage (e.g. "fingerling", "grow-out")
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sensors: SensorSnapshot,
}

impl TankRecord {
    pub fn new(id: impl Into<String>, sensors: SensorSnapshot) -> Self {
        Self {
            id: id.into(),
            sensors,
            ..Default::default()
        }
    }
}
