//! Toast/notification port
//!
//! The engine reports every successful write and every error that is not
//! shown next to a form field through this sink.

use cyclarc_domain::CyclarcError;
use serde::Serialize;
use uuid::Uuid;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// A write went through.
    Success,
    /// Something failed.
    Error,
}

/// A dismissible user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Time-ordered id, used for dismissal.
    pub id: Uuid,
    /// Severity.
    pub level: NotificationLevel,
    /// Text shown to the user.
    pub message: String,
    /// Error label, see [`CyclarcError::label`].
    pub error_kind: Option<&'static str>,
}

impl Notification {
    /// Confirmation of a successful write.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            level: NotificationLevel::Success,
            message: message.into(),
            error_kind: None,
        }
    }

    /// Report `error` to the user.
    pub fn error(error: &CyclarcError) -> Self {
        Self {
            id: Uuid::now_v7(),
            level: NotificationLevel::Error,
            message: error.to_string(),
            error_kind: Some(error.label()),
        }
    }

    /// Whether this reports a failure.
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Consumer of user feedback signals.
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification; must not block.
    fn notify(&self, notification: Notification);
}

/// Sink that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationSink;

impl NotificationSink for NoopNotificationSink {
    fn notify(&self, _notification: Notification) {}
}
