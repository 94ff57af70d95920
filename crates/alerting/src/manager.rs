//! Alert Ledger Implementation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tank_model::{Alert, AlertSeverity, SensorSnapshot};
use thresholds::{classify_reading, ThresholdSpec};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::generate::generate_alerts_at;

/// Alert policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertPolicy {
    /// Acknowledge an outstanding alert automatically once its sensor reads
    /// normal again (default: false)
    #[serde(default)]
    pub auto_resolve_on_normal: bool,
}

/// Query over the ledger. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub severity: Option<AlertSeverity>,
    pub acknowledged: Option<bool>,
    pub tank_id: Option<String>,
    pub limit: Option<usize>,
}

impl AlertFilter {
    fn matches(&self, alert: &Alert) -> bool {
        self.severity.map_or(true, |s| alert.severity == s)
            && self.acknowledged.map_or(true, |a| alert.acknowledged == a)
            && self.tank_id.as_deref().map_or(true, |t| alert.tank_id == t)
    }
}

/// In-memory alert ledger for one or more tanks.
///
/// Alerts are kept newest first and are never removed; they only move from
/// outstanding to acknowledged.
#[derive(Debug, Default)]
pub struct AlertLedger {
    /// Policy
    policy: AlertPolicy,
    /// Alerts, most recent first
    alerts: Vec<Alert>,
}

impl AlertLedger {
    /// Create a new ledger
    pub fn new(policy: AlertPolicy) -> Self {
        info!("Creating alert ledger with policy: {:?}", policy);
        Self {
            policy,
            alerts: Vec::new(),
        }
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Raise alerts for a tank's current snapshot. Returns the new alerts,
    /// which have already been prepended to the ledger.
    pub fn evaluate(&mut self, tank_id: &str, sensors: &SensorSnapshot, thresholds: &ThresholdSpec) -> Vec<Alert> {
        let now = Utc::now();

        if self.policy.auto_resolve_on_normal {
            self.resolve_recovered(tank_id, sensors, thresholds, now);
        }

        let raised = generate_alerts_at(tank_id, sensors, thresholds, &self.alerts, now);
        for alert in &raised {
            warn!(
                "Alert raised [{}] {}/{}: {}",
                alert.severity, alert.tank_id, alert.sensor_name, alert.message
            );
        }
        self.prepend(raised.clone());
        raised
    }

    /// Add alerts at the front of the ledger, keeping their order
    fn prepend(&mut self, alerts: Vec<Alert>) {
        if alerts.is_empty() {
            return;
        }
        let mut merged = alerts;
        merged.append(&mut self.alerts);
        self.alerts = merged;
    }

    /// Sensors missing from the snapshot are not considered recovered
    fn resolve_recovered(
        &mut self,
        tank_id: &str,
        sensors: &SensorSnapshot,
        thresholds: &ThresholdSpec,
        now: DateTime<Utc>,
    ) {
        for alert in self.alerts.iter_mut().filter(|a| !a.acknowledged && a.tank_id == tank_id) {
            let recovered = sensors
                .get(&alert.sensor_name)
                .is_some_and(|reading| classify_reading(&alert.sensor_name, reading, thresholds).is_none());
            if recovered && alert.acknowledge(now) {
                info!("Alert auto-resolved: {}/{}", alert.tank_id, alert.sensor_name);
            }
        }
    }

    /// Acknowledge an alert. Unknown ids and repeated calls are no-ops;
    /// returns whether anything changed.
    pub fn acknowledge(&mut self, id: Uuid) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                let changed = alert.acknowledge(Utc::now());
                if changed {
                    info!("Alert acknowledged: {} ({}/{})", id, alert.tank_id, alert.sensor_name);
                }
                changed
            }
            None => {
                debug!("Acknowledge ignored: unknown alert {}", id);
                false
            }
        }
    }

    /// Acknowledge every outstanding alert. Returns how many changed.
    pub fn clear_all(&mut self) -> usize {
        let now = Utc::now();
        let cleared = self
            .alerts
            .iter_mut()
            .map(|alert| alert.acknowledge(now))
            .filter(|changed| *changed)
            .count();
        info!("Cleared {} outstanding alerts", cleared);
        cleared
    }

    pub fn get(&self, id: Uuid) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// All alerts, most recent first
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Outstanding (unacknowledged) alerts
    pub fn unacknowledged(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| !a.acknowledged)
    }

    pub fn for_tank<'a>(&'a self, tank_id: &'a str) -> impl Iterator<Item = &'a Alert> {
        self.alerts.iter().filter(move |a| a.tank_id == tank_id)
    }

    /// Alerts matching a filter, most recent first
    pub fn query(&self, filter: &AlertFilter) -> Vec<&Alert> {
        self.alerts
            .iter()
            .filter(|a| filter.matches(a))
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect()
    }

    pub fn outstanding_count(&self) -> usize {
        self.unacknowledged().count()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
