use crate::domain::notification::{Notification, NotificationLevel};
use crate::domain::ports::Notifier;
use std::sync::{Arc, Mutex};

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Warning => tracing::warn!("⚠️ {}", notification.message),
            NotificationLevel::Error => tracing::error!("❌ {}", notification.message),
        }
    }
}

/// Collects notifications so a UI (or a test) can drain them later.
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|mut received| std::mem::take(&mut *received))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_drains() {
        let notifier = RecordingNotifier::new();
        let shared = notifier.clone();

        notifier.notify(Notification::warning("requested quantity exceeds stock"));
        notifier.notify(Notification::error("failed to add product"));

        assert_eq!(
            shared.messages(),
            vec!["requested quantity exceeds stock", "failed to add product"]
        );

        let drained = shared.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NotificationLevel::Warning);
        assert!(notifier.notifications().is_empty());
    }
}
