//! Transient on-screen notifications
//!
//! Every call to [`NotificationCenter::notify`] stacks a new, independently
//! dismissible notification. There is no dedup and no queue. Each entry
//! carries a deadline; [`NotificationCenter::prune_expired`] removes the ones
//! whose deadline has passed, and the final fade window before the deadline
//! is reported by [`NotificationCenter::is_fading`].
//!
//! Server-rendered flash messages live here too, with their own timing.

use crate::config::UiConfig;
use crate::core::stock::Severity;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tracing::Level;
use uuid::Uuid;

pub type NotificationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Created by page code at runtime
    Client,
    /// Rendered by the server with the page
    Flash,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub text: String,
    pub severity: Severity,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
    expires_at: Instant,
    fade: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Inside the fade window that ends at the deadline
    pub fn is_fading_at(&self, now: Instant) -> bool {
        !self.is_expired_at(now) && now + self.fade >= self.expires_at
    }

    /// Class list of the rendered alert
    pub fn css_class(&self) -> String {
        format!("alert alert-{}", self.severity)
    }
}

#[derive(Debug)]
pub struct NotificationCenter {
    entries: Vec<Notification>,
    timeout: Duration,
    fade: Duration,
    flash_timeout: Duration,
    flash_fade: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}

/// Log level a notification of `severity` is recorded at
fn log_level(severity: Severity) -> Level {
    match severity {
        Severity::Danger => Level::ERROR,
        Severity::Warning => Level::WARN,
        Severity::Info | Severity::Success => Level::INFO,
    }
}

impl NotificationCenter {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            entries: Vec::new(),
            timeout: config.notification_timeout(),
            fade: config.notification_fade(),
            flash_timeout: config.flash_timeout(),
            flash_fade: config.flash_fade(),
        }
    }

    /// Shows `text` immediately and schedules its removal
    pub fn notify(&mut self, text: impl Into<String>, severity: Severity) -> NotificationId {
        self.push(text.into(), severity, Origin::Client)
    }

    /// Registers a server-rendered flash message for auto-dismissal
    pub fn adopt_flash(&mut self, text: impl Into<String>, severity: Severity) -> NotificationId {
        self.push(text.into(), severity, Origin::Flash)
    }

    fn push(&mut self, text: String, severity: Severity, origin: Origin) -> NotificationId {
        let (timeout, fade) = match origin {
            Origin::Client => (self.timeout, self.fade),
            Origin::Flash => (self.flash_timeout, self.flash_fade),
        };

        let level = log_level(severity);
        if level == Level::ERROR {
            tracing::error!("Notification ({}): {}", severity, text);
        } else if level == Level::WARN {
            tracing::warn!("Notification ({}): {}", severity, text);
        } else {
            tracing::info!("Notification ({}): {}", severity, text);
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            text,
            severity,
            origin,
            created_at: Utc::now(),
            expires_at: Instant::now() + timeout,
            fade,
        };
        let id = notification.id;
        self.entries.push(notification);
        id
    }

    /// Close action. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    /// Removes everything past its deadline; returns how many went
    pub fn prune_expired(&mut self) -> usize {
        self.prune_expired_at(Instant::now())
    }

    pub fn prune_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|n| !n.is_expired_at(now));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!("Pruned {} expired notification(s)", removed);
        }
        removed
    }

    pub fn is_fading(&self, id: NotificationId) -> bool {
        let now = Instant::now();
        self.get(id).is_some_and(|n| n.is_fading_at(now))
    }

    /// Earliest deadline among live notifications
    pub fn next_expiry(&self) -> Option<Instant> {
        self.entries.iter().map(Notification::expires_at).min()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// Most recently created notification
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
