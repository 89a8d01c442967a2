//! Toast notifications.
//!
//! Notifications are fire-and-forget: callers push a message and never look
//! at the outcome. Queued toasts live in the session and are shown once, on
//! the next rendered page.

use larkspur_core::Severity;
use serde::{Deserialize, Serialize};

/// Channel for transient user-facing messages.
pub trait Notifier {
    /// Enqueue a message.
    fn notify(&mut self, message: &str, severity: Severity);
}

/// A single queued message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

/// Toasts waiting to be displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastQueue(Vec<Toast>);

impl ToastQueue {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Queued toasts, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[Toast] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take every queued toast, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.0)
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, message: &str, severity: Severity) {
        tracing::debug!(severity = severity.as_str(), message, "toast queued");
        self.0.push(Toast {
            message: message.to_owned(),
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_then_drain_empties_queue() {
        let mut queue = ToastQueue::new();
        queue.notify("Login successful", Severity::Success);
        queue.notify("Heads up", Severity::Info);

        assert_eq!(queue.pending().len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(
            drained.first().map(|t| t.message.as_str()),
            Some("Login successful")
        );
        assert!(queue.is_empty());
    }
}
