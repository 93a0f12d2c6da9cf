//! Integration Tests for the Refresh Session
//!
//! Drives a real `RefreshSession` against the production `OverlayHost` on
//! paused time, the way the binary wires them together.

use std::sync::Arc;
use std::time::Duration;

use bambu_status::api::OverlayHost;
use bambu_status::printer::PrinterStatus;
use bambu_status::{RefreshSession, Visibility};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

fn overlay_contains(host: &OverlayHost, needle: &str) -> bool {
    host.snapshot().read().unwrap().contains(needle)
}

#[tokio::test(start_paused = true)]
async fn test_tick_rerenders_overlay_from_latest_status() {
    let (tx, rx) = watch::channel(PrinterStatus::new());
    let host = Arc::new(OverlayHost::new(rx));
    let (_vis_tx, vis_rx) = mpsc::unbounded_channel();
    let session = RefreshSession::spawn(host.clone(), vis_rx, Duration::from_millis(2000));

    let mut status = PrinterStatus::new();
    status.print_name = "benchy.3mf".to_string();
    tx.send_replace(status);

    // Before the first tick the snapshot is still the initial render
    sleep(Duration::from_millis(1500)).await;
    assert!(!overlay_contains(&host, "benchy.3mf"));

    sleep(Duration::from_millis(1000)).await;
    assert!(overlay_contains(&host, "benchy.3mf"));

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_feed_recovery_rerenders_immediately() {
    let (tx, rx) = watch::channel(PrinterStatus::new());
    let host = Arc::new(OverlayHost::new(rx));
    let (vis_tx, vis_rx) = mpsc::unbounded_channel();
    let session = RefreshSession::spawn(host.clone(), vis_rx, Duration::from_millis(2000));

    // Feed drops at 500ms, recovers at 900ms with fresh data
    sleep(Duration::from_millis(500)).await;
    vis_tx.send(Visibility::Hidden).unwrap();

    let mut status = PrinterStatus::new();
    status.print_name = "recovered.3mf".to_string();
    tx.send_replace(status);

    sleep(Duration::from_millis(400)).await;
    assert!(!overlay_contains(&host, "recovered.3mf"));

    vis_tx.send(Visibility::Visible).unwrap();
    sleep(Duration::from_millis(50)).await;
    assert!(overlay_contains(&host, "recovered.3mf"));

    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_ticks_keep_rendering_while_hidden() {
    let (tx, rx) = watch::channel(PrinterStatus::new());
    let host = Arc::new(OverlayHost::new(rx));
    let (vis_tx, vis_rx) = mpsc::unbounded_channel();
    let session = RefreshSession::spawn(host.clone(), vis_rx, Duration::from_millis(2000));

    vis_tx.send(Visibility::Hidden).unwrap();

    let mut status = PrinterStatus::new();
    status.print_name = "background.3mf".to_string();
    tx.send_replace(status);

    // The schedule is not paused while hidden
    sleep(Duration::from_millis(2500)).await;
    assert!(overlay_contains(&host, "background.3mf"));

    session.shutdown();
}
