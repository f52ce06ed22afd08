use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_millis(4000);

/// Older notifications are dropped once this many are queued.
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Instant::now(),
        }
    }
}

/// Toast queue shown in the bottom-right corner of every screen.
#[derive(Debug, Clone)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!("Notify: {}", notification.message),
            _ => tracing::debug!("Notify: {}", notification.message),
        }
        self.items.push_back(notification);
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Info, message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Success, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Error, message));
    }

    /// Drops notifications older than the configured lifetime.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < ttl);
    }

    pub fn dismiss_latest(&mut self) {
        self.items.pop_back();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_drops_only_old_notifications() {
        let mut notifications = Notifications::new(Duration::from_secs(4));
        let start = Instant::now();
        notifications.push(Notification {
            level: NotificationLevel::Info,
            message: "old".to_string(),
            created_at: start,
        });
        notifications.push(Notification {
            level: NotificationLevel::Error,
            message: "new".to_string(),
            created_at: start + Duration::from_secs(3),
        });

        notifications.expire(start + Duration::from_secs(5));

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications.latest().map(|n| n.message.as_str()), Some("new"));
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut notifications = Notifications::default();
        for i in 0..10 {
            notifications.info(format!("message {i}"));
        }

        assert_eq!(notifications.len(), MAX_VISIBLE);
        assert_eq!(
            notifications.latest().map(|n| n.message.as_str()),
            Some("message 9")
        );
    }

    #[test]
    fn test_dismiss_latest() {
        let mut notifications = Notifications::default();
        notifications.success("saved");
        notifications.error("failed");

        notifications.dismiss_latest();

        assert_eq!(
            notifications.latest().map(|n| n.level),
            Some(NotificationLevel::Success)
        );
    }
}
