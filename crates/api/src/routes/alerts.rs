//! Alert Routes

use alerting::AlertFilter;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tank_model::{Alert, AlertSeverity};
use uuid::Uuid;

use crate::SharedState;

/// Query parameters for alerts endpoint
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Filter by severity
    pub severity: Option<AlertSeverity>,
    /// Filter by acknowledged status
    pub acknowledged: Option<bool>,
    /// Filter by tank
    pub tank_id: Option<String>,
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for alerts endpoint
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub data: Vec<Alert>,
    pub count: usize,
    pub unacknowledged_count: usize,
}

/// Response for acknowledge endpoint
#[derive(Debug, Serialize)]
pub struct AcknowledgeResponse {
    pub id: Uuid,
    /// False when the alert was unknown or already acknowledged
    pub changed: bool,
}

/// Response for clear endpoint
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

/// Get alerts, most recent first
pub async fn get_alerts(
    State(state): State<SharedState>,
    Query(params): Query<AlertQuery>,
) -> Json<AlertResponse> {
    let monitor = state.monitor.read().await;
    let filter = AlertFilter {
        severity: params.severity,
        acknowledged: params.acknowledged,
        tank_id: params.tank_id,
        limit: Some(params.limit.min(500)),
    };

    let data: Vec<Alert> = monitor.ledger().query(&filter).into_iter().cloned().collect();

    Json(AlertResponse {
        count: data.len(),
        unacknowledged_count: monitor.ledger().outstanding_count(),
        data,
    })
}

/// Acknowledge one alert
pub async fn acknowledge_alert(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Json<AcknowledgeResponse> {
    let changed = state.monitor.write().await.acknowledge(id);
    Json(AcknowledgeResponse { id, changed })
}

/// Acknowledge every outstanding alert
pub async fn clear_alerts(State(state): State<SharedState>) -> Json<ClearResponse> {
    let cleared = state.monitor.write().await.clear_all();
    Json(ClearResponse { cleared })
}
