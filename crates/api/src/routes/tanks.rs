//! Tank Routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use storage::ReadingRecord;
use tank_model::{Alert, TankRecord};
use tank_monitor::{MonitorState, TankView};

use crate::{ApiError, SharedState};

/// Response for tank listing
#[derive(Debug, Serialize)]
pub struct TanksResponse {
    pub data: Vec<TankView>,
    pub count: usize,
    pub state: MonitorState,
}

/// Response for tank ingest
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub tank: TankView,
    pub raised: Vec<Alert>,
}

/// Query parameters for history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of records to return
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// Response for history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<ReadingRecord>,
    pub count: usize,
}

/// List every known tank with its classification
pub async fn list_tanks(State(state): State<SharedState>) -> Json<TanksResponse> {
    let monitor = state.monitor.read().await;
    let data: Vec<TankView> = monitor.tanks().cloned().collect();

    Json(TanksResponse {
        count: data.len(),
        state: monitor.state().clone(),
        data,
    })
}

/// Get one tank
pub async fn get_tank(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<TankView>, ApiError> {
    let monitor = state.monitor.read().await;
    monitor
        .tank(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::TankNotFound(id))
}

/// Ingest a tank document. The path id replaces any id in the body.
pub async fn put_tank(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(mut record): Json<TankRecord>,
) -> Result<Json<UpdateResponse>, ApiError> {
    record.id = id.clone();

    let mut monitor = state.monitor.write().await;
    let raised = monitor.apply_update(record)?;
    let tank = monitor
        .tank(&id)
        .cloned()
        .ok_or_else(|| ApiError::TankNotFound(id))?;

    Ok(Json(UpdateResponse { tank, raised }))
}

/// Reading history of a tank, newest first
pub async fn get_history(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let monitor = state.monitor.read().await;
    let data = monitor.history(&id, params.limit.min(1000))?;

    Ok(Json(HistoryResponse {
        count: data.len(),
        data,
    }))
}
