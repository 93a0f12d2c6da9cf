//! API Handlers
//!
//! HTTP request handlers for each status server endpoint.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use tokio::sync::watch;

use crate::error::{Result, StatusError};
use crate::models::HealthResponse;
use crate::printer::PrinterStatus;
use crate::refresh::updater_script;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Latest printer status from the feed
    pub status: watch::Receiver<PrinterStatus>,
    /// Rendered overlay snapshot, kept fresh by the refresh session
    pub overlay: Arc<RwLock<String>>,
    /// Interval baked into the served updater script
    pub refresh_interval: Duration,
}

impl AppState {
    /// Creates a new AppState from the feed's status stream and the
    /// overlay host's snapshot.
    pub fn new(
        status: watch::Receiver<PrinterStatus>,
        overlay: Arc<RwLock<String>>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            status,
            overlay,
            refresh_interval,
        }
    }
}

/// Handler for GET /
///
/// Serves the rendered overlay snapshot.
pub async fn overlay_handler(State(state): State<AppState>) -> Result<Html<String>> {
    let snapshot = state
        .overlay
        .read()
        .map_err(|e| StatusError::Internal(format!("Overlay snapshot lock poisoned: {}", e)))?;
    Ok(Html(snapshot.clone()))
}

/// Handler for GET /api/status
///
/// Returns the current printer status as JSON.
pub async fn status_handler(State(state): State<AppState>) -> Json<PrinterStatus> {
    Json(state.status.borrow().clone())
}

/// Handler for GET /static/js/updater.js
///
/// Serves the browser-side refresh script with the configured interval.
pub async fn script_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        updater_script(state.refresh_interval),
    )
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
