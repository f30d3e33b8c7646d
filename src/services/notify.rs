//! Best-effort desktop notifications for session completion

use notify_rust::Notification;
use tracing::{debug, info};

/// Desktop notification capability, probed once at startup.
///
/// Delivery is never guaranteed: when the platform has no notification
/// server, or a send fails, the attempt is logged and dropped. A failed
/// notification is not an error condition.
pub struct Notifier {
    available: bool,
}

impl Notifier {
    /// Check once whether a notification server is reachable
    pub fn probe() -> Self {
        let available = notify_rust::get_server_information().is_ok();
        if available {
            info!("Desktop notifications available");
        } else {
            info!("Desktop notifications unavailable, completion alerts will be skipped");
        }
        Self { available }
    }

    /// A notifier that silently drops everything (tests, headless runs)
    pub fn disabled() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Send a notification if the capability was granted; no-op otherwise
    pub fn notify(&self, summary: &str, body: &str) {
        if !self.available {
            debug!("Notification suppressed (no server): {}", body);
            return;
        }
        if let Err(e) = Notification::new().summary(summary).body(body).show() {
            debug!("Failed to deliver notification: {}", e);
        }
    }
}
