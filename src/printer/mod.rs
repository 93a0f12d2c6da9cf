//! Printer Module
//!
//! Everything that talks to or models the Bambu Lab printer: the status
//! model served over HTTP, the MQTT report payload parsing, and the TLS
//! MQTT feed that keeps the status current.

pub mod feed;
pub mod report;
pub mod status;

pub use feed::PrinterFeed;
pub use report::BambuReport;
pub use status::PrinterStatus;
