//! Response models for the status server API
//!
//! DTOs for HTTP response bodies that are not part of the printer status
//! model itself.

pub mod responses;

pub use responses::{ErrorResponse, HealthResponse};
