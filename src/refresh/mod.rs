//! Page Refresh Module
//!
//! Keeps the status overlay fresh. The session drives periodic reloads plus
//! an immediate reload whenever the page becomes visible again, against
//! injectable host capabilities so tests can simulate time and visibility.

pub mod script;
pub mod session;

pub use script::updater_script;
pub use session::{PageHost, RefreshSession, Visibility, REFRESH_INTERVAL};
