use std::sync::{Arc, Mutex};

use cyclarc_core::{Notification, NotificationLevel, NotificationSink};

/// Notification sink that keeps everything it receives.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.level == NotificationLevel::Error).collect()
    }

    pub fn successes(&self) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.level == NotificationLevel::Success).collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}
