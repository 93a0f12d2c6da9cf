//! API Module
//!
//! HTTP handlers and routing for the status overlay server.
//!
//! # Endpoints
//! - `GET /` - Rendered status overlay page
//! - `GET /api/status` - Current printer status as JSON
//! - `GET /static/js/updater.js` - Browser-side refresh script
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod overlay;
pub mod routes;

pub use handlers::*;
pub use overlay::{render_overlay, OverlayHost};
pub use routes::create_router;
