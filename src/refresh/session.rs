//! Refresh Session
//!
//! Owns the two subscriptions that keep the overlay page fresh: a repeating
//! tick timer and a visibility event stream. Each tick unconditionally
//! requests a full reload from the host. A Hidden -> Visible transition
//! requests an immediate reload regardless of where the tick cycle stands;
//! Visible -> Hidden only logs, the timer keeps running in the background.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

/// Interval between forced page reloads.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(2000);

// == Visibility ==
/// Host-reported flag: is the page the active, foregrounded view?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

// == Page Host ==
/// Capabilities the session needs from its host environment.
///
/// A reload request is fire-and-forget: there is no result and no error
/// path. A failed reload is the host's concern, surfaced through its own
/// navigation-failure behavior.
pub trait PageHost: Send + Sync {
    /// Discard the current page state and re-render from the source.
    fn request_reload(&self);
}

// == Refresh Session ==
/// A running refresh session.
///
/// The session starts in the Visible state and holds a single driver task.
/// Its lifetime equals the page view's: it is never paused, only aborted on
/// teardown.
pub struct RefreshSession {
    handle: JoinHandle<()>,
}

impl RefreshSession {
    /// Spawns the driver task.
    ///
    /// The first tick fires one full `refresh_interval` after spawn, then
    /// every `refresh_interval` thereafter. The tick schedule is independent
    /// of the visibility state machine and keeps firing while Hidden.
    ///
    /// `visibility` must deliver every transition; events repeating the
    /// current state are ignored.
    pub fn spawn(
        host: Arc<dyn PageHost>,
        mut visibility: mpsc::UnboundedReceiver<Visibility>,
        refresh_interval: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            info!(
                "Refresh session started with interval of {} ms",
                refresh_interval.as_millis()
            );

            let mut ticker = interval_at(Instant::now() + refresh_interval, refresh_interval);
            let mut state = Visibility::Visible;
            let mut events_open = true;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("Scheduled tick, requesting reload");
                        host.request_reload();
                    }
                    event = visibility.recv(), if events_open => {
                        match event {
                            Some(next) if next != state => {
                                state = next;
                                match next {
                                    Visibility::Hidden => {
                                        info!("Page hidden - updates will continue");
                                    }
                                    Visibility::Visible => {
                                        info!("Page visible - refreshing now");
                                        host.request_reload();
                                    }
                                }
                            }
                            Some(_) => {}
                            None => {
                                // Sender gone; keep ticking on schedule.
                                debug!("Visibility stream closed");
                                events_open = false;
                            }
                        }
                    }
                }
            }
        });

        Self { handle }
    }

    /// Tears the session down by aborting the driver task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }

    /// Whether the driver task has finished (only after shutdown).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
