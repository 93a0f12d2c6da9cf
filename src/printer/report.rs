//! Bambu Report Parsing
//!
//! Deserializes the printer's MQTT `report` payload and converts it into
//! the normalized status model. Reports can be partial; absent fields fall
//! back to zero values and a parsed report replaces the whole status.

use chrono::Utc;
use serde::Deserialize;

use super::status::PrinterStatus;

// == Bambu Report ==
/// Top-level MQTT report message.
#[derive(Debug, Clone, Deserialize)]
pub struct BambuReport {
    #[serde(default)]
    pub print: PrintData,
}

/// The `print` object inside a report, with the printer's own field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrintData {
    #[serde(default)]
    pub bed_target_temper: f64,
    #[serde(default)]
    pub bed_temper: f64,
    #[serde(default)]
    pub chamber_temper: f64,
    #[serde(default)]
    pub nozzle_target_temper: f64,
    #[serde(default)]
    pub nozzle_temper: f64,

    #[serde(default)]
    pub gcode_state: String,
    #[serde(default)]
    pub subtask_name: String,
    #[serde(default)]
    pub gcode_file: String,

    #[serde(default)]
    pub mc_percent: i64,
    /// Remaining time in minutes
    #[serde(default)]
    pub mc_remaining_time: i64,
    #[serde(default)]
    pub layer_num: i64,
    #[serde(default)]
    pub total_layer_num: i64,

    /// Unix timestamp in seconds, sent as a string
    #[serde(default)]
    pub gcode_start_time: String,
}

impl BambuReport {
    /// Converts a report into the normalized status.
    pub fn to_status(&self) -> PrinterStatus {
        let mut status = PrinterStatus::new();

        // Print name: prefer subtask_name, fall back to gcode_file
        if !self.print.subtask_name.is_empty() {
            status.print_name = self.print.subtask_name.clone();
        } else if !self.print.gcode_file.is_empty() {
            status.print_name = self.print.gcode_file.clone();
        }

        status.progress = self.print.mc_percent as f64;
        status.current_layer = self.print.layer_num;
        status.total_layers = self.print.total_layer_num;

        status.nozzle_temp = self.print.nozzle_temper;
        status.nozzle_temp_target = self.print.nozzle_target_temper;
        status.bed_temp = self.print.bed_temper;
        status.bed_temp_target = self.print.bed_target_temper;
        status.ambient_temp = self.print.chamber_temper;

        // The printer reports remaining time in minutes
        status.time_remaining = self.print.mc_remaining_time * 60;

        // Elapsed time derives from the job's start timestamp
        if let Ok(start) = self.print.gcode_start_time.parse::<i64>() {
            status.time_elapsed = (Utc::now().timestamp() - start).max(0);
        }

        status.last_updated = Utc::now();
        status
    }
}
