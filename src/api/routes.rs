//! API Routes
//!
//! Configures the Axum router with all status server endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, overlay_handler, script_handler, status_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Rendered status overlay page
/// - `GET /api/status` - Current printer status as JSON
/// - `GET /static/js/updater.js` - Browser-side refresh script
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (the overlay is embedded by OBS)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(overlay_handler))
        .route("/api/status", get(status_handler))
        .route("/static/js/updater.js", get(script_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
