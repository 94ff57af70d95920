//! Monitor Implementation

use alerting::{AlertLedger, AlertPolicy};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use storage::{ReadingRecord, Repository, DEFAULT_MAX_RECORDS};
use tank_model::{Alert, TankRecord};
use thresholds::{evaluate, Evaluation, ThresholdPatch, ThresholdSpec};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::MonitorError;

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Initial threshold table
    pub thresholds: ThresholdSpec,
    /// Alert policy
    pub policy: AlertPolicy,
    /// History retention (records across all tanks)
    pub history_max_records: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdSpec::default(),
            policy: AlertPolicy::default(),
            history_max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

/// Latest record of a tank together with its classification
#[derive(Debug, Clone, Serialize)]
pub struct TankView {
    pub record: TankRecord,
    pub evaluation: Evaluation,
}

/// Loading and error flags shown by the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorState {
    /// True until the first update arrives
    pub loading: bool,
    /// Last feed error, cleared by the next successful update
    pub error: Option<String>,
}

/// A monitoring session. Each instance is fully isolated.
pub struct TankMonitor {
    tanks: BTreeMap<String, TankView>,
    thresholds: ThresholdSpec,
    ledger: AlertLedger,
    history: Repository,
    state: MonitorState,
}

impl TankMonitor {
    /// Create a new monitor
    pub fn new(config: MonitorConfig) -> Self {
        for problem in config.thresholds.validate() {
            warn!("Threshold table: {}", problem);
        }
        info!("Creating tank monitor with {} sensor thresholds", config.thresholds.len());
        Self {
            tanks: BTreeMap::new(),
            thresholds: config.thresholds,
            ledger: AlertLedger::new(config.policy),
            history: Repository::new(config.history_max_records),
            state: MonitorState {
                loading: true,
                error: None,
            },
        }
    }

    /// Replace a tank's record, classify it and raise alerts.
    /// Returns the alerts raised by this update.
    pub fn apply_update(&mut self, mut record: TankRecord) -> Result<Vec<Alert>, MonitorError> {
        if record.id.is_empty() {
            return Err(MonitorError::MissingTankId);
        }
        let received_at = Utc::now();
        if record.last_update.is_none() {
            record.last_update = Some(received_at);
        }

        let evaluation = evaluate(&record.sensors, &self.thresholds);

        // Nothing is touched if the history write fails
        self.history.insert_reading(ReadingRecord {
            tank_id: record.id.clone(),
            recorded_at: received_at,
            sensors: record.sensors.clone(),
            overall: evaluation.overall,
        })?;

        let raised = self.ledger.evaluate(&record.id, &record.sensors, &self.thresholds);

        info!(
            "Tank {} updated: overall {} ({} new alerts)",
            record.id,
            evaluation.overall,
            raised.len()
        );
        self.tanks
            .insert(record.id.clone(), TankView { record, evaluation });
        self.state = MonitorState::default();

        metrics::counter!("tank_updates_total").increment(1);
        self.record_alert_metrics(raised.len());
        Ok(raised)
    }

    /// Merge a partial threshold update and re-evaluate every tank.
    /// Returns the alerts raised by the re-evaluation.
    pub fn update_thresholds(&mut self, patch: &ThresholdPatch) -> Vec<Alert> {
        self.thresholds.merge(patch);
        info!("Thresholds updated for {} sensors", patch.sensors().count());
        self.after_threshold_change()
    }

    /// Replace the whole threshold table and re-evaluate every tank
    pub fn replace_thresholds(&mut self, thresholds: ThresholdSpec) -> Vec<Alert> {
        self.thresholds = thresholds;
        info!("Threshold table replaced ({} sensors)", self.thresholds.len());
        self.after_threshold_change()
    }

    fn after_threshold_change(&mut self) -> Vec<Alert> {
        for problem in self.thresholds.validate() {
            warn!("Threshold table: {}", problem);
        }

        let mut raised = Vec::new();
        for (tank_id, view) in self.tanks.iter_mut() {
            view.evaluation = evaluate(&view.record.sensors, &self.thresholds);
            raised.extend(self.ledger.evaluate(tank_id, &view.record.sensors, &self.thresholds));
        }
        self.record_alert_metrics(raised.len());
        raised
    }

    /// Acknowledge one alert; unknown or already acknowledged ids are ignored
    pub fn acknowledge(&mut self, id: Uuid) -> bool {
        let changed = self.ledger.acknowledge(id);
        if changed {
            metrics::counter!("alerts_acknowledged_total").increment(1);
            self.record_alert_metrics(0);
        }
        changed
    }

    /// Acknowledge every outstanding alert
    pub fn clear_all(&mut self) -> usize {
        let cleared = self.ledger.clear_all();
        metrics::counter!("alerts_acknowledged_total").increment(cleared as u64);
        self.record_alert_metrics(0);
        cleared
    }

    /// Log a feed failure and raise the error flag
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("Tank feed error: {}", message);
        self.state.loading = false;
        self.state.error = Some(message);
    }

    fn record_alert_metrics(&self, raised: usize) {
        if raised > 0 {
            metrics::counter!("alerts_raised_total").increment(raised as u64);
        }
        metrics::gauge!("alerts_outstanding").set(self.ledger.outstanding_count() as f64);
    }

    pub fn tank(&self, id: &str) -> Option<&TankView> {
        self.tanks.get(id)
    }

    pub fn tanks(&self) -> impl Iterator<Item = &TankView> {
        self.tanks.values()
    }

    pub fn tank_count(&self) -> usize {
        self.tanks.len()
    }

    pub fn thresholds(&self) -> &ThresholdSpec {
        &self.thresholds
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Reading history of a tank, newest first
    pub fn history(&self, tank_id: &str, limit: usize) -> Result<Vec<ReadingRecord>, MonitorError> {
        Ok(self.history.get_history(tank_id, limit)?)
    }

    pub fn history_count(&self) -> usize {
        self.history.reading_count()
    }
}

impl Default for TankMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
