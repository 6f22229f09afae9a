//! User-facing notifications.
//!
//! Store operations report their outcome through a [`Notifier`] rather than
//! rendering anything themselves. The default [`TracingNotifier`] emits a
//! `tracing` event; a UI would implement the trait to show a toast.

use parking_lot::Mutex;

/// Outcome class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A titled message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, title: &str, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Success,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn error(&self, title: &str, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Error,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

/// Logs notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Success => {
                tracing::info!(title = %n.title, message = %n.message, "notification")
            }
            NotificationLevel::Error => {
                tracing::warn!(title = %n.title, message = %n.message, "notification")
            }
        }
    }
}

/// Keeps every notification in memory. Useful in tests and for callers
/// that render notifications after the fact.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    /// Remove and return the notifications received so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock())
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}
