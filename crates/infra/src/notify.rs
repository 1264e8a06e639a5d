//! Notification sinks
//!
//! Adapters for the core [`NotificationSink`] port: one that only logs, one
//! that queues notifications until the host drains them.

use std::collections::VecDeque;

use cyclarc_core::{Notification, NotificationLevel, NotificationSink};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Writes every notification to the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!(id = %notification.id, summary = %notification.message, "notification");
            }
            NotificationLevel::Error => {
                warn!(
                    id = %notification.id,
                    kind = notification.error_kind.unwrap_or("unknown"),
                    summary = %notification.message,
                    "error notification"
                );
            }
        }
    }
}

/// Bounded queue of notifications waiting to be shown.
///
/// When full, the oldest entry is dropped.
#[derive(Debug)]
pub struct QueuedNotificationSink {
    capacity: usize,
    queue: Mutex<VecDeque<Notification>>,
}

impl QueuedNotificationSink {
    /// Queue keeping at most `capacity` notifications, dropping the oldest.
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), queue: Mutex::new(VecDeque::new()) }
    }

    /// Take all pending notifications, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.queue.lock().drain(..).collect()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Default for QueuedNotificationSink {
    fn default() -> Self {
        Self::new(32)
    }
}

impl NotificationSink for QueuedNotificationSink {
    fn notify(&self, notification: Notification) {
        TracingNotificationSink.notify(notification.clone());
        let mut queue = self.queue.lock();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(notification);
    }
}
