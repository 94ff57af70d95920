//! Sensor Readings and Snapshots

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Water temperature (°C)
pub const TEMPERATURE: &str = "temperature";
/// Acidity (pH units)
pub const PH: &str = "ph";
/// Dissolved oxygen (mg/L)
pub const OXYGEN: &str = "oxygen";
/// Salinity (ppt)
pub const SALINITY: &str = "salinity";

/// Unit suffix used when rendering a reading of the given sensor.
pub fn unit_for(sensor: &str) -> &'static str {
    match sensor {
        TEMPERATURE => "°C",
        OXYGEN => " mg/L",
        SALINITY => " ppt",
        _ => "",
    }
}

/// Human readable sensor label.
pub fn display_name(sensor: &str) -> String {
    match sensor {
        PH => "pH".to_string(),
        OXYGEN => "Oxygen".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// A single sensor value as delivered by the data source.
///
/// Anything that is not a JSON number is kept as `NotNumeric` instead of
/// failing the whole document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    NotNumeric,
}

impl Reading {
    /// The numeric value, if it is a finite number.
    pub fn as_finite(&self) -> Option<f64> {
        match *self {
            Reading::Value(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Value(value)
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_finite() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw.as_f64() {
            Some(v) => Reading::Value(v),
            None => Reading::NotNumeric,
        })
    }
}

/// Point-in-time readings of every sensor of one tank, keyed by sensor name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSnapshot {
    readings: BTreeMap<String, Reading>,
}

impl SensorSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a numeric reading
    pub fn with(mut self, sensor: impl Into<String>, value: f64) -> Self {
        self.insert(sensor, value);
        self
    }

    /// Insert or replace a reading
    pub fn insert(&mut self, sensor: impl Into<String>, reading: impl Into<Reading>) {
        self.readings.insert(sensor.into(), reading.into());
    }

    pub fn get(&self, sensor: &str) -> Option<Reading> {
        self.readings.get(sensor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Reading)> {
        self.readings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SensorSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut snapshot = SensorSnapshot::new();
        for (sensor, value) in iter {
            snapshot.insert(sensor, value);
        }
        snapshot
    }
}
