//! Transient toast notifications.

use std::collections::VecDeque;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// How long each kind of toast stays up.
pub const ADDED_DURATION: Duration = Duration::from_secs(2);
pub const DELETED_DURATION: Duration = Duration::from_secs(2);
pub const DOWNLOADED_DURATION: Duration = Duration::from_secs(3);
pub const FAILED_DURATION: Duration = Duration::from_secs(4);

/// Oldest toasts are dropped past this many.
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: Option<String>,
    pub created: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= self.duration
    }

    /// Fraction of the lifetime left, from 1.0 down to 0.0.
    pub fn remaining(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.created).as_secs_f32();
        (1.0 - elapsed / self.duration.as_secs_f32().max(f32::EPSILON)).clamp(0.0, 1.0)
    }
}

/// Queue of toasts shown in the corner of the window.
#[derive(Debug, Default)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_at(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        description: Option<String>,
        duration: Duration,
        now: Instant,
    ) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            kind,
            title: title.into(),
            description,
            created: now,
            duration,
        });
    }

    pub fn push(&mut self, kind: ToastKind, title: impl Into<String>, description: Option<String>, duration: Duration) {
        self.push_at(kind, title, description, duration, Instant::now());
    }

    pub fn sticker_added(&mut self, label: &str) {
        self.push(
            ToastKind::Success,
            format!("{label} sticker added!"),
            Some("Drag to move, double-click to delete".into()),
            ADDED_DURATION,
        );
    }

    pub fn sticker_deleted(&mut self) {
        self.push(ToastKind::Success, "Sticker deleted!", None, DELETED_DURATION);
    }

    pub fn sticker_failed(&mut self) {
        self.push(ToastKind::Error, "Failed to add sticker", None, FAILED_DURATION);
    }

    pub fn canvas_downloaded(&mut self) {
        self.push(
            ToastKind::Success,
            "Canvas downloaded!",
            Some("Your sticker creation has been saved as PNG".into()),
            DOWNLOADED_DURATION,
        );
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    /// Toasts oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_after_duration() {
        let start = Instant::now();
        let mut notifications = Notifications::new();
        notifications.push_at(ToastKind::Success, "Sticker deleted!", None, DELETED_DURATION, start);
        notifications.push_at(ToastKind::Error, "Failed to add sticker", None, FAILED_DURATION, start);

        notifications.prune(start + Duration::from_millis(1999));
        assert_eq!(notifications.len(), 2);

        notifications.prune(start + Duration::from_secs(2));
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications.iter().next().unwrap().kind, ToastKind::Error);

        notifications.prune(start + Duration::from_secs(4));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_remaining_fraction() {
        let start = Instant::now();
        let toast = Toast {
            kind: ToastKind::Success,
            title: "Canvas downloaded!".into(),
            description: None,
            created: start,
            duration: Duration::from_secs(4),
        };
        assert_eq!(toast.remaining(start), 1.0);
        assert!((toast.remaining(start + Duration::from_secs(1)) - 0.75).abs() < 1e-6);
        assert_eq!(toast.remaining(start + Duration::from_secs(10)), 0.0);
    }

    #[test]
    fn test_queue_is_bounded() {
        let now = Instant::now();
        let mut notifications = Notifications::new();
        for i in 0..(MAX_TOASTS + 2) {
            notifications.push_at(ToastKind::Success, format!("toast {i}"), None, ADDED_DURATION, now);
        }
        assert_eq!(notifications.len(), MAX_TOASTS);
        assert_eq!(notifications.iter().next().unwrap().title, "toast 2");
    }

    #[test]
    fn test_sticker_added_message() {
        let mut notifications = Notifications::new();
        notifications.sticker_added("Penguin");
        let toast = notifications.iter().next().unwrap();
        assert_eq!(toast.title, "Penguin sticker added!");
        assert_eq!(toast.description.as_deref(), Some("Drag to move, double-click to delete"));
        assert_eq!(toast.duration, ADDED_DURATION);
    }
}
