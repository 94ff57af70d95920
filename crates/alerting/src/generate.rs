//! Alert Generation

use chrono::{DateTime, Utc};
use tank_model::{display_name, unit_for, Alert, AlertSeverity, SensorSnapshot};
use thresholds::{classify_reading, Breach, ThresholdSpec};
use tracing::debug;
use uuid::Uuid;

/// New alerts for every breached sensor of a tank that has no outstanding
/// (unacknowledged) alert yet. `existing` is not modified.
pub fn generate_alerts(
    tank_id: &str,
    sensors: &SensorSnapshot,
    thresholds: &ThresholdSpec,
    existing: &[Alert],
) -> Vec<Alert> {
    generate_alerts_at(tank_id, sensors, thresholds, existing, Utc::now())
}

/// [`generate_alerts`] with an explicit creation time
pub fn generate_alerts_at(
    tank_id: &str,
    sensors: &SensorSnapshot,
    thresholds: &ThresholdSpec,
    existing: &[Alert],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut raised = Vec::new();

    for (sensor, reading) in sensors.iter() {
        let Some(breach) = classify_reading(sensor, reading, thresholds) else {
            continue;
        };
        let Some(severity) = AlertSeverity::from_status(breach.status) else {
            continue;
        };
        // as_finite() is Some whenever classify_reading returned a breach
        let Some(value) = reading.as_finite() else {
            continue;
        };

        if existing.iter().any(|a| a.is_outstanding_for(tank_id, sensor)) {
            debug!("Alert suppressed: {}/{} already outstanding", tank_id, sensor);
            continue;
        }

        raised.push(Alert {
            id: Uuid::new_v4(),
            tank_id: tank_id.to_string(),
            sensor_name: sensor.to_string(),
            severity,
            current_value: value,
            threshold_value: breach.bound,
            message: describe(sensor, value, &breach),
            created_at: now,
            acknowledged: false,
            acknowledged_at: None,
        });
    }

    raised
}

fn describe(sensor: &str, value: f64, breach: &Breach) -> String {
    let unit = unit_for(sensor);
    let direction = if value < breach.bound { "below" } else { "above" };
    format!(
        "{} is {} the {} limit: {}{} (limit {}{})",
        display_name(sensor),
        direction,
        breach.status,
        value,
        unit,
        breach.bound,
        unit
    )
}
