//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bambu_status::api::{create_router, OverlayHost};
use bambu_status::printer::PrinterStatus;
use bambu_status::{AppState, PageHost};
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (watch::Sender<PrinterStatus>, OverlayHost, Router) {
    let (tx, rx) = watch::channel(PrinterStatus::new());
    let host = OverlayHost::new(rx.clone());
    host.request_reload();
    let state = AppState::new(rx, host.snapshot(), Duration::from_millis(2000));
    let app = create_router(state);
    (tx, host, app)
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// == Overlay Endpoint Tests ==

#[tokio::test]
async fn test_overlay_serves_idle_page() {
    let (_tx, _host, app) = create_test_app();

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Idle"));
    assert!(html.contains("/static/js/updater.js"));
}

#[tokio::test]
async fn test_overlay_updates_after_reload() {
    let (tx, host, app) = create_test_app();

    let mut status = PrinterStatus::new();
    status.print_name = "benchy.3mf".to_string();
    status.progress = 42.0;
    tx.send_replace(status);

    // The snapshot only changes once a reload is requested
    let response = app.clone().oneshot(get("/")).await.unwrap();
    let html = body_to_string(response.into_body()).await;
    assert!(!html.contains("benchy.3mf"));

    host.request_reload();
    let response = app.oneshot(get("/")).await.unwrap();
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("benchy.3mf"));
}

// == Status Endpoint Tests ==

#[tokio::test]
async fn test_status_returns_current_state() {
    let (tx, _host, app) = create_test_app();

    let mut status = PrinterStatus::new();
    status.print_name = "calibration.3mf".to_string();
    status.current_layer = 12;
    status.total_layers = 80;
    status.nozzle_temp = 219.5;
    tx.send_replace(status);

    let response = app.oneshot(get("/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["print_name"], "calibration.3mf");
    assert_eq!(json["current_layer"], 12);
    assert_eq!(json["total_layers"], 80);
    assert_eq!(json["nozzle_temp"], 219.5);
    assert!(json.get("last_updated").is_some());
}

// == Updater Script Endpoint Tests ==

#[tokio::test]
async fn test_updater_script_is_served_as_javascript() {
    let (_tx, _host, app) = create_test_app();

    let response = app.oneshot(get("/static/js/updater.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("application/javascript"));

    let js = body_to_string(response.into_body()).await;
    assert!(js.contains("const REFRESH_INTERVAL = 2000;"));
    assert!(js.contains("visibilitychange"));
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (_tx, _host, app) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
