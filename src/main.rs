//! Bambu Status - a printer status overlay server
//!
//! Subscribes to a Bambu Lab printer's MQTT report topic and serves an
//! auto-refreshing HTML status overlay.

mod api;
mod config;
mod error;
mod models;
mod printer;
mod refresh;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState, OverlayHost};
use config::Config;
use printer::PrinterFeed;
use refresh::{PageHost, RefreshSession};

/// Main entry point for the status overlay server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the MQTT printer feed
/// 4. Render the initial overlay snapshot and start the refresh session
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bambu_status=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bambu Status Server");

    // Load configuration from environment variables
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: mqtt={}:{}, serial={}, port={}, refresh_interval={}ms",
        config.mqtt.host,
        config.mqtt.port,
        config.mqtt.serial.as_deref().unwrap_or("<auto>"),
        config.server_port,
        config.refresh_interval_ms
    );

    // Connect the printer feed; its connectivity drives page visibility
    let (feed, visibility) = PrinterFeed::connect(&config.mqtt);
    info!("Printer feed started");

    // Render the initial overlay and start the refresh session
    let host = Arc::new(OverlayHost::new(feed.status_updates()));
    host.request_reload();
    let session = RefreshSession::spawn(host.clone(), visibility, config.refresh_interval());

    // Create router with all endpoints
    let state = AppState::new(
        feed.status_updates(),
        host.snapshot(),
        config.refresh_interval(),
    );
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind HTTP listener")?;
    info!("Server listening on http://{}", addr);
    info!("OBS Browser Source URL: http://localhost:{}/", config.server_port);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(session, feed))
        .await
        .context("HTTP server failed")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, stops the refresh session and disconnects the feed.
async fn shutdown_signal(session: RefreshSession, feed: PrinterFeed) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    session.shutdown();
    warn!("Refresh session stopped");
    feed.disconnect().await;
}
