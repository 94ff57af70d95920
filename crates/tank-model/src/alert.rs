//! Alert Record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::AlertSeverity;

/// A sensor breach, tracked until acknowledged. Never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub tank_id: String,
    pub sensor_name: String,
    pub severity: AlertSeverity,
    pub current_value: f64,
    /// The bound that was crossed
    pub threshold_value: f64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// Whether this alert is still outstanding for the given tank and sensor
    pub fn is_outstanding_for(&self, tank_id: &str, sensor_name: &str) -> bool {
        !self.acknowledged && self.tank_id == tank_id && self.sensor_name == sensor_name
    }

    /// Mark acknowledged. Returns false if it already was.
    pub fn acknowledge(&mut self, at: DateTime<Utc>) -> bool {
        if self.acknowledged {
            return false;
        }
        self.acknowledged = true;
        self.acknowledged_at = Some(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Alert {
        Alert {
            id: Uuid::new_v4(),
            tank_id: "t1".to_string(),
            sensor_name: "ph".to_string(),
            severity: AlertSeverity::Warning,
            current_value: 9.1,
            threshold_value: 8.5,
            message: "pH is above the warning limit".to_string(),
            created_at: Utc::now(),
            acknowledged: false,
            acknowledged_at: None,
        }
    }

    #[test]
    fn test_acknowledge_once() {
        let mut alert = sample();
        let first = Utc::now();

        assert!(alert.acknowledge(first));
        assert!(alert.acknowledged);
        assert_eq!(alert.acknowledged_at, Some(first));

        // Second call keeps the original timestamp
        assert!(!alert.acknowledge(first + chrono::Duration::seconds(5)));
        assert_eq!(alert.acknowledged_at, Some(first));
    }

    #[test]
    fn test_outstanding_match() {
        let mut alert = sample();
        assert!(alert.is_outstanding_for("t1", "ph"));
        assert!(!alert.is_outstanding_for("t2", "ph"));
        assert!(!alert.is_outstanding_for("t1", "oxygen"));

        alert.acknowledge(Utc::now());
        assert!(!alert.is_outstanding_for("t1", "ph"));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["sensor_name"], "ph");
        assert!(json["acknowledged_at"].is_null());
    }
}
