//! Router tests driven through tower's oneshot

use api::{create_governor_config, create_rate_limited_router, create_router, AppState, RateLimitConfig};
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tank_monitor::MonitorConfig;
use tower::ServiceExt;

fn app() -> Router {
    create_router(Arc::new(AppState::new(MonitorConfig::default())))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_reports_loading_before_first_update() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["loading"], true);
    assert_eq!(body["metrics"]["tank_count"], 0);
}

#[tokio::test]
async fn test_ingest_and_read_tank() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/tanks/t1",
        Some(json!({
            "id": "ignored",
            "name": "Tilapia A",
            "sensors": {"temperature": 14.0, "ph": 7.0}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tank"]["record"]["id"], "t1");
    assert_eq!(body["tank"]["evaluation"]["overall"], "critical");
    assert_eq!(body["tank"]["evaluation"]["per_sensor"]["ph"], "normal");
    assert_eq!(body["raised"][0]["threshold_value"], 15.0);

    let (status, body) = call(&app, Method::GET, "/api/v1/tanks/t1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["name"], "Tilapia A");

    let (_, body) = call(&app, Method::GET, "/api/v1/tanks", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["state"]["loading"], false);
}

#[tokio::test]
async fn test_unknown_tank_is_404() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/v1/tanks/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Tank not found: nope");
}

#[tokio::test]
async fn test_alert_dedup_acknowledge_and_clear() {
    let app = app();
    let reading = json!({"sensors": {"ph": 9.5, "oxygen": 4.0}});

    call(&app, Method::PUT, "/api/v1/tanks/t1", Some(reading.clone())).await;
    let (_, second) = call(&app, Method::PUT, "/api/v1/tanks/t1", Some(reading)).await;
    assert_eq!(second["raised"].as_array().map(Vec::len), Some(0));

    let (_, alerts) = call(&app, Method::GET, "/api/v1/alerts", None).await;
    assert_eq!(alerts["count"], 2);
    assert_eq!(alerts["unacknowledged_count"], 2);

    let (_, critical) = call(&app, Method::GET, "/api/v1/alerts?severity=critical", None).await;
    assert_eq!(critical["count"], 1);
    assert_eq!(critical["data"][0]["sensor_name"], "ph");

    let id = critical["data"][0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/alerts/{}/acknowledge", id);
    let (status, ack) = call(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["changed"], true);

    let (_, again) = call(&app, Method::POST, &uri, None).await;
    assert_eq!(again["changed"], false);

    let (_, cleared) = call(&app, Method::POST, "/api/v1/alerts/clear", None).await;
    assert_eq!(cleared["cleared"], 1);

    let (_, outstanding) = call(&app, Method::GET, "/api/v1/alerts?acknowledged=false", None).await;
    assert_eq!(outstanding["count"], 0);
}

#[tokio::test]
async fn test_acknowledge_unknown_alert_is_ok() {
    let app = app();
    let uri = "/api/v1/alerts/7f1c1c1e-5d7a-4c43-9a43-2f0f7c7d0a11/acknowledge";
    let (status, body) = call(&app, Method::POST, uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], false);
}

#[tokio::test]
async fn test_threshold_patch_reevaluates_tanks() {
    let app = app();
    call(
        &app,
        Method::PUT,
        "/api/v1/tanks/t1",
        Some(json!({"sensors": {"salinity": 33.0}})),
    )
    .await;

    let (status, body) = call(
        &app,
        Method::PATCH,
        "/api/v1/thresholds",
        Some(json!({"salinity": {"max": 30.0}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thresholds"]["salinity"]["max"], 30.0);
    assert_eq!(body["thresholds"]["salinity"]["min"], 10.0);
    assert_eq!(body["raised"][0]["sensor_name"], "salinity");
    assert_eq!(body["warnings"].as_array().map(Vec::len), Some(0));

    let (_, tank) = call(&app, Method::GET, "/api/v1/tanks/t1", None).await;
    assert_eq!(tank["evaluation"]["overall"], "warning");
}

#[tokio::test]
async fn test_threshold_replace_reevaluates_tanks() {
    let app = app();
    let (_, ingest) = call(
        &app,
        Method::PUT,
        "/api/v1/tanks/t1",
        Some(json!({"sensors": {"temperature": 22.0, "ph": 9.5}})),
    )
    .await;
    assert_eq!(ingest["raised"][0]["sensor_name"], "ph");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/v1/thresholds",
        Some(json!({
            "temperature": {"min": 10.0, "max": 20.0, "critical_min": 5.0, "critical_max": 25.0}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thresholds"]["temperature"]["max"], 20.0);
    assert!(body["thresholds"].get("ph").is_none());
    assert_eq!(body["raised"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["raised"][0]["sensor_name"], "temperature");
    assert_eq!(body["raised"][0]["threshold_value"], 20.0);

    let (_, tank) = call(&app, Method::GET, "/api/v1/tanks/t1", None).await;
    assert_eq!(tank["evaluation"]["overall"], "warning");
    assert_eq!(tank["evaluation"]["per_sensor"]["ph"], "normal");

    let (_, thresholds) = call(&app, Method::GET, "/api/v1/thresholds", None).await;
    assert_eq!(thresholds.as_object().map(|t| t.len()), Some(1));
}

#[tokio::test]
async fn test_threshold_patch_reports_warnings() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::PATCH,
        "/api/v1/thresholds",
        Some(json!({"ph": {"min": 9.5}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thresholds"]["ph"]["min"], 9.5);
    assert!(!body["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_newest_first() {
    let app = app();
    for temperature in [20.0, 21.0, 22.0] {
        call(
            &app,
            Method::PUT,
            "/api/v1/tanks/t1",
            Some(json!({"sensors": {"temperature": temperature}})),
        )
        .await;
    }

    let (status, body) = call(&app, Method::GET, "/api/v1/tanks/t1/history?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["sensors"]["temperature"], 22.0);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = app();
    let (status, _) = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn status_from(app: &Router, method: Method, uri: &str, peer: SocketAddr) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(peer))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_rate_limit_applies_to_writes_only() {
    let config = create_governor_config(&RateLimitConfig {
        per_second: 60,
        burst_size: 2,
    })
    .unwrap();
    let app = create_rate_limited_router(Arc::new(AppState::new(MonitorConfig::default())), config);
    let peer = SocketAddr::from(([10, 0, 0, 7], 40000));

    for _ in 0..10 {
        assert_eq!(status_from(&app, Method::GET, "/api/v1/health", peer).await, StatusCode::OK);
        assert_eq!(status_from(&app, Method::GET, "/api/v1/alerts", peer).await, StatusCode::OK);
        assert_eq!(status_from(&app, Method::GET, "/metrics", peer).await, StatusCode::NOT_FOUND);
    }

    assert_eq!(status_from(&app, Method::POST, "/api/v1/alerts/clear", peer).await, StatusCode::OK);
    assert_eq!(status_from(&app, Method::POST, "/api/v1/alerts/clear", peer).await, StatusCode::OK);
    assert_eq!(
        status_from(&app, Method::POST, "/api/v1/alerts/clear", peer).await,
        StatusCode::TOO_MANY_REQUESTS
    );

    // Reads still pass once writes are exhausted
    assert_eq!(status_from(&app, Method::GET, "/api/v1/tanks", peer).await, StatusCode::OK);
}
