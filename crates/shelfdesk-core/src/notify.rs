//! Ephemeral user-visible feedback for request outcomes.
//!
//! The request client reports failures through the `Notifier` trait and
//! the view layer reports its own success messages the same way. Toasts
//! live for a fixed duration and are never queued or coalesced -
//! concurrent notifications simply coexist on screen.

use std::time::{Duration, Instant};

/// How long a toast stays on screen before removing itself.
pub const TOAST_DURATION: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Sink for transient notifications. Injected into the request client
/// so tests can record what was surfaced without a UI.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: ToastKind);
}

/// A single on-screen notification.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created: Instant::now(),
        }
    }

    /// Whether the toast has outlived its display duration.
    pub fn is_expired(&self) -> bool {
        self.expired_at(Instant::now())
    }

    fn expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= TOAST_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_duration() {
        let toast = Toast::new("Book deleted.", ToastKind::Success);
        let created = toast.created;

        assert!(!toast.expired_at(created));
        assert!(!toast.expired_at(created + Duration::from_millis(3400)));
        assert!(toast.expired_at(created + Duration::from_millis(3500)));
        assert!(toast.expired_at(created + Duration::from_secs(60)));
    }

    #[test]
    fn test_toast_keeps_message_and_kind() {
        let toast = Toast::new("No copies available", ToastKind::Error);
        assert_eq!(toast.message, "No copies available");
        assert_eq!(toast.kind, ToastKind::Error);
    }
}
