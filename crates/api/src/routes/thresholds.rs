//! Threshold Routes

use axum::{extract::State, Json};
use serde::Serialize;
use tank_model::Alert;
use ::thresholds::{ThresholdPatch, ThresholdSpec};

use crate::SharedState;

/// Response after a threshold change
#[derive(Debug, Serialize)]
pub struct ThresholdUpdateResponse {
    pub thresholds: ThresholdSpec,
    /// Advisory consistency problems; the table was applied regardless
    pub warnings: Vec<String>,
    /// Alerts raised by re-evaluating every tank
    pub raised: Vec<Alert>,
}

/// Current threshold table
pub async fn get_thresholds(State(state): State<SharedState>) -> Json<ThresholdSpec> {
    Json(state.monitor.read().await.thresholds().clone())
}

/// Merge a partial threshold table and re-evaluate
pub async fn patch_thresholds(
    State(state): State<SharedState>,
    Json(patch): Json<ThresholdPatch>,
) -> Json<ThresholdUpdateResponse> {
    let mut monitor = state.monitor.write().await;
    let raised = monitor.update_thresholds(&patch);
    Json(response(monitor.thresholds(), raised))
}

/// Replace the threshold table and re-evaluate
pub async fn put_thresholds(
    State(state): State<SharedState>,
    Json(spec): Json<ThresholdSpec>,
) -> Json<ThresholdUpdateResponse> {
    let mut monitor = state.monitor.write().await;
    let raised = monitor.replace_thresholds(spec);
    Json(response(monitor.thresholds(), raised))
}

fn response(thresholds: &ThresholdSpec, raised: Vec<Alert>) -> ThresholdUpdateResponse {
    ThresholdUpdateResponse {
        thresholds: thresholds.clone(),
        warnings: thresholds.validate().iter().map(ToString::to_string).collect(),
        raised,
    }
}
