//! Notifications
//!
//! Ephemeral success/danger messages shown to the user after a command or
//! a failed sync.

use std::sync::Mutex;
use std::time::Duration;

/// How long a dashboard toast stays visible
pub const TOAST_TTL: Duration = Duration::from_millis(3000);

/// How long an auth-page alert stays visible
pub const ALERT_TTL: Duration = Duration::from_millis(5000);

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Danger,
}

/// A transient, dismissible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub ttl: Duration,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
            ttl: TOAST_TTL,
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: Level::Danger,
            message: message.into(),
            ttl: TOAST_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn is_success(&self) -> bool {
        self.level == Level::Success
    }
}

/// Receives notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Records notifications in memory
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Most recent notification
    pub fn last(&self) -> Option<Notification> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.last().cloned())
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        if notification.level == Level::Danger {
            tracing::warn!(message = %notification.message, "Danger notification");
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notification);
        }
    }
}

/// Prints notifications for the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => println!("✓ {}", notification.message),
            Level::Danger => {
                tracing::warn!(message = %notification.message, "Danger notification");
                eprintln!("✕ {}", notification.message);
            }
        }
    }
}
