//! # Notifications
//!
//! The out-of-band "tell the user X succeeded/failed" channel. Controllers and pages
//! call a [`Notifier`] wherever the user should see a toast; what
//! the notifier does with it (log, queue for rendering, record for a test) is up to
//! whoever constructs the page.

use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Success => "ok",
            Level::Info => "info",
            Level::Warning => "warn",
            Level::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Writes notifications to the trace log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success | Level::Info => info!(message = %notification.message, "Notify"),
            Level::Warning => warn!(message = %notification.message, "Notify"),
            Level::Error => error!(message = %notification.message, "Notify"),
        }
    }
}

/// Keeps every notification in memory, in arrival order.
///
/// Clones share the same log, so a page can own one handle while a renderer (or a
/// test) drains another.
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages_at(Level::Success)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages_at(Level::Error)
    }

    /// Removes and returns everything logged so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    fn messages_at(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        // A poisoned log still holds valid notifications.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}

/// Sends every notification to both sinks, first `A` then `B`.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&self, notification: Notification) {
        self.0.notify(notification.clone());
        self.1.notify(notification);
    }
}
