//! Threshold Tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tank_model::{OXYGEN, PH, SALINITY, TEMPERATURE};

use crate::error::ThresholdError;

/// Which sides of the band are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdShape {
    /// Low and high bounds both apply
    TwoSided,
    /// Only low readings are a problem (dissolved oxygen)
    LowOnly,
}

impl ThresholdShape {
    /// Shape used when a threshold does not name one
    pub fn infer(sensor: &str) -> Self {
        if sensor == OXYGEN {
            ThresholdShape::LowOnly
        } else {
            ThresholdShape::TwoSided
        }
    }
}

/// Bounds for a single sensor.
///
/// Readings inside `[min, max]` are normal, outside are a warning, and beyond
/// the optional critical bounds are critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorThreshold {
    pub min: f64,
    pub max: f64,
    #[serde(default, alias = "criticalMin", alias = "criticalmin", skip_serializing_if = "Option::is_none")]
    pub critical_min: Option<f64>,
    #[serde(default, alias = "criticalMax", alias = "criticalmax", skip_serializing_if = "Option::is_none")]
    pub critical_max: Option<f64>,
    /// Explicit shape; inferred from the sensor name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ThresholdShape>,
}

impl SensorThreshold {
    /// Two-sided threshold with both critical bounds
    pub fn two_sided(min: f64, max: f64, critical_min: f64, critical_max: f64) -> Self {
        Self {
            min,
            max,
            critical_min: Some(critical_min),
            critical_max: Some(critical_max),
            shape: None,
        }
    }

    /// Low-only threshold. `max` is kept for display but never checked.
    pub fn low_only(min: f64, max: f64, critical_min: f64) -> Self {
        Self {
            min,
            max,
            critical_min: Some(critical_min),
            critical_max: None,
            shape: Some(ThresholdShape::LowOnly),
        }
    }

    /// Starting point for sensors first introduced through a patch
    fn unbounded() -> Self {
        Self {
            min: f64::MIN,
            max: f64::MAX,
            critical_min: None,
            critical_max: None,
            shape: None,
        }
    }

    /// Effective shape for the named sensor
    pub fn shape_for(&self, sensor: &str) -> ThresholdShape {
        self.shape.unwrap_or_else(|| ThresholdShape::infer(sensor))
    }

    fn apply(&mut self, patch: &SensorThresholdPatch) {
        if let Some(min) = patch.min {
            self.min = min;
        }
        if let Some(max) = patch.max {
            self.max = max;
        }
        if let Some(critical_min) = patch.critical_min {
            self.critical_min = Some(critical_min);
        }
        if let Some(critical_max) = patch.critical_max {
            self.critical_max = Some(critical_max);
        }
        if let Some(shape) = patch.shape {
            self.shape = Some(shape);
        }
    }

    fn validate(&self, sensor: &str, errors: &mut Vec<ThresholdError>) {
        let bounds = [
            ("min", Some(self.min)),
            ("max", Some(self.max)),
            ("critical_min", self.critical_min),
            ("critical_max", self.critical_max),
        ];
        for (bound, value) in bounds {
            if matches!(value, Some(v) if !v.is_finite()) {
                errors.push(ThresholdError::NonFiniteBound {
                    sensor: sensor.to_string(),
                    bound,
                });
            }
        }

        if self.min > self.max && self.shape_for(sensor) == ThresholdShape::TwoSided {
            errors.push(ThresholdError::InvertedRange {
                sensor: sensor.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        if let Some(critical_min) = self.critical_min {
            if critical_min > self.min {
                errors.push(ThresholdError::CriticalMinAboveMin {
                    sensor: sensor.to_string(),
                    critical_min,
                    min: self.min,
                });
            }
        }
        if let Some(critical_max) = self.critical_max {
            if critical_max < self.max && self.shape_for(sensor) == ThresholdShape::TwoSided {
                errors.push(ThresholdError::CriticalMaxBelowMax {
                    sensor: sensor.to_string(),
                    critical_max,
                    max: self.max,
                });
            }
        }
    }
}

/// Threshold table keyed by sensor name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdSpec {
    sensors: BTreeMap<String, SensorThreshold>,
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        let mut spec = Self::empty();
        spec.insert(TEMPERATURE, SensorThreshold::two_sided(18.0, 28.0, 15.0, 30.0));
        spec.insert(PH, SensorThreshold::two_sided(6.5, 8.5, 6.0, 9.0));
        spec.insert(OXYGEN, SensorThreshold::low_only(5.0, 8.0, 3.0));
        spec.insert(SALINITY, SensorThreshold::two_sided(10.0, 35.0, 5.0, 40.0));
        spec
    }
}

impl ThresholdSpec {
    /// Table with no sensors; every reading evaluates to normal
    pub fn empty() -> Self {
        Self {
            sensors: BTreeMap::new(),
        }
    }

    pub fn get(&self, sensor: &str) -> Option<&SensorThreshold> {
        self.sensors.get(sensor)
    }

    pub fn insert(&mut self, sensor: impl Into<String>, threshold: SensorThreshold) {
        self.sensors.insert(sensor.into(), threshold);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SensorThreshold)> {
        self.sensors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Merge a partial update field by field.
    ///
    /// The merge is unconditional; call [`ThresholdSpec::validate`] afterwards
    /// to find inconsistencies.
    pub fn merge(&mut self, patch: &ThresholdPatch) {
        for (sensor, fields) in &patch.sensors {
            self.sensors
                .entry(sensor.clone())
                .or_insert_with(SensorThreshold::unbounded)
                .apply(fields);
        }
    }

    /// Advisory consistency check over every entry
    pub fn validate(&self) -> Vec<ThresholdError> {
        let mut errors = Vec::new();
        for (sensor, threshold) in &self.sensors {
            threshold.validate(sensor, &mut errors);
        }
        errors
    }
}

/// Partial bounds for one sensor; `None` leaves the current value in place.
///
/// The lowercase aliases cover config files, whose keys are lowercased on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorThresholdPatch {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default, alias = "criticalMin", alias = "criticalmin")]
    pub critical_min: Option<f64>,
    #[serde(default, alias = "criticalMax", alias = "criticalmax")]
    pub critical_max: Option<f64>,
    #[serde(default)]
    pub shape: Option<ThresholdShape>,
}

/// Partial threshold table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdPatch {
    sensors: BTreeMap<String, SensorThresholdPatch>,
}

impl ThresholdPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry
    pub fn with(mut self, sensor: impl Into<String>, fields: SensorThresholdPatch) -> Self {
        self.sensors.insert(sensor.into(), fields);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn sensors(&self) -> impl Iterator<Item = &str> {
        self.sensors.keys().map(String::as_str)
    }
}
