//! Overlay Rendering
//!
//! Renders the printer status into the overlay page and owns the shared
//! snapshot the root route serves. `OverlayHost` is the production page
//! host: a reload request re-renders the snapshot from the latest status.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::warn;

use crate::printer::PrinterStatus;
use crate::refresh::PageHost;

// == Overlay Host ==
/// Renders reload requests into the shared overlay snapshot.
pub struct OverlayHost {
    status: watch::Receiver<PrinterStatus>,
    snapshot: Arc<RwLock<String>>,
}

impl OverlayHost {
    /// Creates a host with an empty snapshot; call `request_reload` once to
    /// produce the initial page.
    pub fn new(status: watch::Receiver<PrinterStatus>) -> Self {
        Self {
            status,
            snapshot: Arc::new(RwLock::new(String::new())),
        }
    }

    /// Shared handle to the rendered snapshot, for the router state.
    pub fn snapshot(&self) -> Arc<RwLock<String>> {
        self.snapshot.clone()
    }
}

impl PageHost for OverlayHost {
    fn request_reload(&self) {
        let html = render_overlay(&self.status.borrow());
        match self.snapshot.write() {
            Ok(mut snapshot) => *snapshot = html,
            Err(e) => warn!("Overlay snapshot lock poisoned: {}", e),
        }
    }
}

// == Rendering ==
/// Renders the overlay page for the given status.
///
/// The page is styled for an OBS browser source (transparent background)
/// and pulls in the updater script that keeps it fresh.
pub fn render_overlay(status: &PrinterStatus) -> String {
    let progress = status.progress.clamp(0.0, 100.0);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Printer Status</title>
<style>
  body {{ background: transparent; color: #fff; font-family: sans-serif; margin: 0; }}
  .overlay {{ background: rgba(0, 0, 0, 0.7); border-radius: 8px; padding: 16px; width: 320px; }}
  .print-name {{ font-size: 1.2em; font-weight: bold; margin-bottom: 8px; }}
  .progress-track {{ background: #333; border-radius: 4px; height: 10px; }}
  .progress-fill {{ background: #4caf50; border-radius: 4px; height: 10px; width: {progress:.0}%; }}
  .row {{ display: flex; justify-content: space-between; margin-top: 6px; font-size: 0.9em; }}
</style>
<script src="/static/js/updater.js"></script>
</head>
<body>
<div class="overlay">
  <div class="print-name">{name}</div>
  <div class="progress-track"><div class="progress-fill"></div></div>
  <div class="row"><span>Progress</span><span>{progress:.0}%</span></div>
  <div class="row"><span>Layer</span><span>{layer} / {total_layers}</span></div>
  <div class="row"><span>Nozzle</span><span>{nozzle:.1}&deg; / {nozzle_target:.0}&deg;</span></div>
  <div class="row"><span>Bed</span><span>{bed:.1}&deg; / {bed_target:.0}&deg;</span></div>
  <div class="row"><span>Chamber</span><span>{ambient:.1}&deg;</span></div>
  <div class="row"><span>Remaining</span><span>{remaining}</span></div>
  <div class="row"><span>Elapsed</span><span>{elapsed}</span></div>
</div>
</body>
</html>
"#,
        name = escape_html(&status.print_name),
        progress = progress,
        layer = status.current_layer.max(0),
        total_layers = status.total_layers.max(0),
        nozzle = status.nozzle_temp,
        nozzle_target = status.nozzle_temp_target,
        bed = status.bed_temp,
        bed_target = status.bed_temp_target,
        ambient = status.ambient_temp,
        remaining = status.format_time_remaining(),
        elapsed = status.format_time_elapsed(),
    )
}

/// Print job names come from the printer and land in HTML.
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_shows_status_fields() {
        let mut status = PrinterStatus::new();
        status.print_name = "benchy.3mf".to_string();
        status.progress = 42.0;
        status.current_layer = 57;
        status.total_layers = 132;
        status.time_remaining = 90 * 60;

        let html = render_overlay(&status);
        assert!(html.contains("benchy.3mf"));
        assert!(html.contains("42%"));
        assert!(html.contains("57 / 132"));
        assert!(html.contains("1h 30m"));
    }

    #[test]
    fn test_overlay_links_updater_script() {
        let html = render_overlay(&PrinterStatus::new());
        assert!(html.contains(r#"<script src="/static/js/updater.js"></script>"#));
    }

    #[test]
    fn test_overlay_escapes_print_name() {
        let mut status = PrinterStatus::new();
        status.print_name = "<script>alert(1)</script>".to_string();
        let html = render_overlay(&status);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_overlay_clamps_negative_layers() {
        let mut status = PrinterStatus::new();
        status.current_layer = -1;
        status.total_layers = -1;
        let html = render_overlay(&status);
        assert!(html.contains("0 / 0"));
    }

    #[test]
    fn test_overlay_clamps_progress() {
        let mut status = PrinterStatus::new();
        status.progress = 250.0;
        let html = render_overlay(&status);
        assert!(html.contains("width: 100%"));
    }

    #[test]
    fn test_host_reload_renders_snapshot() {
        let (tx, rx) = watch::channel(PrinterStatus::new());
        let host = OverlayHost::new(rx);
        assert!(host.snapshot().read().unwrap().is_empty());

        host.request_reload();
        assert!(host.snapshot().read().unwrap().contains("Idle"));

        let mut status = PrinterStatus::new();
        status.print_name = "calibration.3mf".to_string();
        tx.send_replace(status);
        host.request_reload();
        assert!(host.snapshot().read().unwrap().contains("calibration.3mf"));
    }
}
