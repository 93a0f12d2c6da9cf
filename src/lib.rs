//! Bambu Status - a printer status overlay server
//!
//! Subscribes to a Bambu Lab printer's MQTT report topic and serves an
//! auto-refreshing HTML status overlay (e.g. for an OBS browser source).

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod printer;
pub mod refresh;

pub use api::AppState;
pub use config::Config;
pub use refresh::{PageHost, RefreshSession, Visibility, REFRESH_INTERVAL};
