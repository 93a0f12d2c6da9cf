//! Printer Status Model
//!
//! The normalized view of the printer's state, as rendered on the overlay
//! and returned by the JSON API.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Printer Status ==
/// Current state of the printer.
#[derive(Debug, Clone, Serialize)]
pub struct PrinterStatus {
    /// Name of the running print job ("Idle" when none)
    pub print_name: String,
    /// Progress percentage (0-100)
    pub progress: f64,
    /// Current layer number (the printer can briefly report negatives)
    pub current_layer: i64,
    /// Total layer count for the job
    pub total_layers: i64,
    /// Nozzle temperature in degrees Celsius
    pub nozzle_temp: f64,
    /// Nozzle target temperature
    pub nozzle_temp_target: f64,
    /// Bed temperature
    pub bed_temp: f64,
    /// Bed target temperature
    pub bed_temp_target: f64,
    /// Chamber/ambient temperature
    pub ambient_temp: f64,
    /// Estimated time remaining in seconds
    pub time_remaining: i64,
    /// Time elapsed since the job started, in seconds
    pub time_elapsed: i64,
    /// When this status was last refreshed from the printer
    pub last_updated: DateTime<Utc>,
}

impl PrinterStatus {
    /// Creates an idle status with all readings at zero.
    pub fn new() -> Self {
        Self {
            print_name: "Idle".to_string(),
            progress: 0.0,
            current_layer: 0,
            total_layers: 0,
            nozzle_temp: 0.0,
            nozzle_temp_target: 0.0,
            bed_temp: 0.0,
            bed_temp_target: 0.0,
            ambient_temp: 0.0,
            time_remaining: 0,
            time_elapsed: 0,
            last_updated: Utc::now(),
        }
    }

    // == Display Formatting ==
    /// Formats the remaining time for the overlay, `--:--` when unknown.
    pub fn format_time_remaining(&self) -> String {
        format_duration(self.time_remaining)
    }

    /// Formats the elapsed time for the overlay.
    pub fn format_time_elapsed(&self) -> String {
        format_duration(self.time_elapsed)
    }
}

impl Default for PrinterStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a duration in seconds as `Nh MMm`, `Nm`, or `--:--` when
/// zero or negative.
fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "--:--".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
