use eframe::egui::Color32;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Success,
    Warning,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Error => "❌",
            NotificationKind::Success => "✅",
            NotificationKind::Warning => "⚠",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            NotificationKind::Error => Color32::from_rgb(220, 50, 50),
            NotificationKind::Success => Color32::from_rgb(0, 180, 0),
            NotificationKind::Warning => Color32::from_rgb(230, 160, 20),
        }
    }
}

/// The single banner shown at the top of the window.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        message: impl Into<String>,
        now: Instant,
        ttl: Duration,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let now = Instant::now();
        let note = Notification::new(NotificationKind::Success, "done", now, Duration::from_secs(5));
        assert!(!note.is_expired(now + Duration::from_secs(4)));
        assert!(note.is_expired(now + Duration::from_secs(5)));
        assert_eq!(note.remaining(now + Duration::from_secs(2)), Duration::from_secs(3));
        assert_eq!(note.remaining(now + Duration::from_secs(9)), Duration::ZERO);
    }
}
