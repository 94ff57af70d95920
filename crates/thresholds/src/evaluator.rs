//! Snapshot Classification

use serde::Serialize;
use std::collections::BTreeMap;
use tank_model::{Reading, SensorSnapshot, SensorStatus};

use crate::table::{SensorThreshold, ThresholdShape, ThresholdSpec};

/// A reading outside its normal band, and the bound it crossed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breach {
    pub status: SensorStatus,
    pub bound: f64,
}

impl Breach {
    fn critical(bound: f64) -> Self {
        Self {
            status: SensorStatus::Critical,
            bound,
        }
    }

    fn warning(bound: f64) -> Self {
        Self {
            status: SensorStatus::Warning,
            bound,
        }
    }
}

/// Classify a finite value. `None` means normal.
///
/// Critical bounds are checked before warning bounds, and the lower bound
/// before the upper one.
pub fn classify(value: f64, threshold: &SensorThreshold, shape: ThresholdShape) -> Option<Breach> {
    if let Some(critical_min) = threshold.critical_min {
        if value < critical_min {
            return Some(Breach::critical(critical_min));
        }
    }

    if shape == ThresholdShape::TwoSided {
        if let Some(critical_max) = threshold.critical_max {
            if value > critical_max {
                return Some(Breach::critical(critical_max));
            }
        }
    }

    if value < threshold.min {
        return Some(Breach::warning(threshold.min));
    }

    if shape == ThresholdShape::TwoSided && value > threshold.max {
        return Some(Breach::warning(threshold.max));
    }

    None
}

/// Classify one sensor of a snapshot.
///
/// Unknown sensors and readings that are not finite numbers are normal.
pub fn classify_reading(sensor: &str, reading: Reading, thresholds: &ThresholdSpec) -> Option<Breach> {
    let value = reading.as_finite()?;
    let threshold = thresholds.get(sensor)?;
    classify(value, threshold, threshold.shape_for(sensor))
}

/// Per-sensor statuses of one snapshot plus the overall tank status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub per_sensor: BTreeMap<String, SensorStatus>,
    pub overall: SensorStatus,
}

impl Evaluation {
    pub fn status_of(&self, sensor: &str) -> SensorStatus {
        self.per_sensor.get(sensor).copied().unwrap_or_default()
    }
}

/// Evaluate every sensor in the snapshot against the threshold table
pub fn evaluate(sensors: &SensorSnapshot, thresholds: &ThresholdSpec) -> Evaluation {
    let per_sensor: BTreeMap<String, SensorStatus> = sensors
        .iter()
        .map(|(sensor, reading)| {
            let status = classify_reading(sensor, reading, thresholds)
                .map(|breach| breach.status)
                .unwrap_or_default();
            (sensor.to_string(), status)
        })
        .collect();

    let overall = SensorStatus::worst(per_sensor.values().copied());
    Evaluation { per_sensor, overall }
}
