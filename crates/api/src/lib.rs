//! Tank Monitoring API Server
//!
//! REST API for the aquaculture tank dashboard: tank status, alert ledger,
//! thresholds and reading history.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tank_monitor::{MonitorConfig, TankMonitor};
use tokio::sync::RwLock;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod rate_limit;
mod routes;
mod settings;

pub use error::{ApiError, ServerError};
pub use rate_limit::{create_governor_config, DefaultGovernorConfig, RateLimitConfig};
pub use settings::{HistorySettings, LoggingSettings, ServerSettings, Settings};

/// Application state shared across handlers
pub struct AppState {
    /// Monitoring session
    pub monitor: Arc<RwLock<TankMonitor>>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when a recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            monitor: Arc::new(RwLock::new(TankMonitor::new(config))),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub type SharedState = Arc<AppState>;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub metrics: SystemMetrics,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub tank_count: usize,
    pub alert_count: usize,
    pub outstanding_alerts: usize,
    pub history_records: usize,
}

/// Create the application router without rate limiting
pub fn create_router(state: SharedState) -> Router {
    build_router(state, None)
}

/// Create the application router with the mutating routes rate limited per
/// client IP. Reads and `/metrics` are never limited.
pub fn create_rate_limited_router(state: SharedState, governor: Arc<DefaultGovernorConfig>) -> Router {
    build_router(state, Some(governor))
}

fn build_router(state: SharedState, governor: Option<Arc<DefaultGovernorConfig>>) -> Router {
    let reads = Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/tanks", get(routes::tanks::list_tanks))
        .route("/api/v1/tanks/:id", get(routes::tanks::get_tank))
        .route("/api/v1/tanks/:id/history", get(routes::tanks::get_history))
        .route("/api/v1/alerts", get(routes::alerts::get_alerts))
        .route("/api/v1/thresholds", get(routes::thresholds::get_thresholds))
        .route("/metrics", get(metrics_handler));

    let mut writes = Router::new()
        .route("/api/v1/tanks/:id", put(routes::tanks::put_tank))
        .route("/api/v1/alerts/clear", post(routes::alerts::clear_alerts))
        .route(
            "/api/v1/alerts/:id/acknowledge",
            post(routes::alerts::acknowledge_alert),
        )
        .route(
            "/api/v1/thresholds",
            patch(routes::thresholds::patch_thresholds).put(routes::thresholds::put_thresholds),
        );
    if let Some(config) = governor {
        writes = writes.layer(GovernorLayer { config });
    }

    reads
        .merge(writes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let monitor = state.monitor.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let status = if monitor.state().error.is_some() {
        "degraded"
    } else {
        "healthy"
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        loading: monitor.state().loading,
        error: monitor.state().error.clone(),
        metrics: SystemMetrics {
            tank_count: monitor.tank_count(),
            alert_count: monitor.ledger().len(),
            outstanding_alerts: monitor.ledger().outstanding_count(),
            history_records: monitor.history_count(),
        },
    };

    Json(response)
}

/// Prometheus scrape endpoint
async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(
    settings: &LoggingSettings,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = settings.level.parse::<Level>().unwrap_or(Level::INFO);

    if settings.json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Run the server
pub async fn run_server(settings: Settings) -> Result<(), ServerError> {
    let mut state = AppState::new(settings.monitor_config());
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Prometheus recorder not installed: {}", e),
    }

    let state = Arc::new(state);
    let app = match create_governor_config(&settings.rate_limit) {
        Some(config) => create_rate_limited_router(state, config),
        None => {
            warn!("Rate limiting disabled: invalid config {:?}", settings.rate_limit);
            create_router(state)
        }
    };

    info!("Starting API server on {}", settings.server.addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
