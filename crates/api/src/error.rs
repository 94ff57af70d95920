//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tank_monitor::MonitorError;
use thiserror::Error;

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Tank not found: {0}")]
    TankNotFound(String),

    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::TankNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Monitor(MonitorError::MissingTankId) => StatusCode::BAD_REQUEST,
            ApiError::Monitor(MonitorError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
