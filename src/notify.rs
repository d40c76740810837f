//! Desktop notifications.
//!
//! Fire-and-forget: the engines never observe a delivery result, and a
//! failed toast must not fail a due check, so errors are logged and
//! swallowed here.

use notify_rust::Notification;
use tracing::warn;

/// Display timeout for desktop notifications, in milliseconds.
const TIMEOUT_MS: i32 = 10_000;

/// Notification urgency, mapped onto the platform's levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Critical,
}

/// Sink for reminder notifications.
pub trait Notifier {
    /// Deliver a notification. No return value is observed.
    fn notify(&self, title: &str, message: &str, urgency: Urgency);
}

/// Desktop notifier backed by the platform notification service.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str, urgency: Urgency) {
        let level = match urgency {
            Urgency::Normal => notify_rust::Urgency::Normal,
            Urgency::Critical => notify_rust::Urgency::Critical,
        };
        if let Err(e) = Notification::new()
            .summary(title)
            .body(message)
            .appname("duewatch")
            .urgency(level)
            .timeout(TIMEOUT_MS)
            .show()
        {
            warn!("failed to deliver notification '{title}': {e}");
        }
    }
}
