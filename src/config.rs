//! Configuration Module
//!
//! Handles loading and validating server configuration from environment
//! variables. Absent optional variables fall back to defaults; a variable
//! that is present but unparseable fails startup instead of being silently
//! replaced.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, StatusError};
use crate::refresh::REFRESH_INTERVAL;

// == MQTT Config ==
/// Connection parameters for the printer's MQTT broker.
#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// Broker hostname or IP
    pub host: String,
    /// Broker port (Bambu printers listen on 8883)
    pub port: u16,
    /// MQTT username
    pub username: String,
    /// MQTT password (the printer's access code)
    pub password: String,
    /// Printer serial number; auto-discovered when unset
    pub serial: Option<String>,
}

// == Server Config ==
/// Full server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Printer broker connection parameters
    pub mqtt: MqttConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Milliseconds between forced overlay reloads
    pub refresh_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MQTT_HOST` - Broker hostname/IP (required)
    /// - `MQTT_PORT` - Broker port (default: 8883)
    /// - `MQTT_USERNAME` - MQTT username (default: "bblp")
    /// - `MQTT_PASSWORD` - MQTT password (required)
    /// - `PRINTER_SERIAL` - Printer serial (default: auto-discover)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `REFRESH_INTERVAL_MS` - Overlay refresh interval (default: 2000)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup, so tests never
    /// have to mutate process-wide environment state.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            mqtt: MqttConfig {
                host: required(&lookup, "MQTT_HOST")?,
                port: parse_or(lookup("MQTT_PORT"), "MQTT_PORT", 8883)?,
                username: lookup("MQTT_USERNAME")
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| "bblp".to_string()),
                password: required(&lookup, "MQTT_PASSWORD")?,
                serial: lookup("PRINTER_SERIAL").filter(|v| !v.is_empty()),
            },
            server_port: parse_or(lookup("SERVER_PORT"), "SERVER_PORT", 8080)?,
            refresh_interval_ms: parse_or(
                lookup("REFRESH_INTERVAL_MS"),
                "REFRESH_INTERVAL_MS",
                REFRESH_INTERVAL.as_millis() as u64,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// The refresh interval must be a positive number of milliseconds.
    fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(StatusError::Config(
                "REFRESH_INTERVAL_MS must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The refresh interval as a Duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

/// A variable that must be present and non-empty.
fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    lookup(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StatusError::Config(format!("{} is required", name)))
}

/// Parses a variable, defaulting only when it is absent. A present but
/// unparseable value is a configuration error, not a silent default.
fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T> {
    match value.filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| StatusError::Config(format!("{} is invalid: {}", name, raw))),
        None => Ok(default),
    }
}
