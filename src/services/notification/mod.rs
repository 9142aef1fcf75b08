//! Event notifications: when to schedule them, the persisted one-shot job
//! queue, and delivery through the desktop notification system.

mod dispatch;
mod queue;
mod schedule;

use anyhow::Result;
use notify_rust::{Notification, Timeout};

pub use dispatch::{dispatch_due, DispatchReport};
pub use queue::{NotificationQueue, PendingNotification};
pub use schedule::{
    decide_schedule, notification_key, NotificationPayload, ScheduleDecision,
    ScheduledNotification,
};

/// Descriptor for the channel event notifications are posted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const NOTIFICATION_CHANNEL: NotificationChannel = NotificationChannel {
    id: "event_countdown_channel",
    name: "Event Countdown Notifications",
    description: "Notifications for when events are happening",
};

/// A user-visible notification about one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNotification {
    /// Id of the event the notification opens when activated.
    pub event_id: i64,
    pub summary: String,
    pub body: String,
}

impl EventNotification {
    pub fn event_time(event_id: i64, title: &str) -> Self {
        Self {
            event_id,
            summary: "Event Time!".to_string(),
            body: format!("{} is happening now!", title),
        }
    }
}

/// Something that can present notifications to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, notification: &EventNotification) -> Result<()>;
}

/// Service for displaying system notifications
#[derive(Debug, Default)]
pub struct NotificationService;

impl NotificationService {
    pub fn new() -> Self {
        Self
    }

    /// Show a simple notification with a title and body
    pub fn show_simple(&self, title: &str, body: &str) -> Result<()> {
        Notification::new()
            .appname(NOTIFICATION_CHANNEL.name)
            .summary(title)
            .body(body)
            .timeout(Timeout::Milliseconds(10000))
            .show()
            .map_err(|e| anyhow::anyhow!("Failed to show notification: {}", e))?;

        Ok(())
    }
}

impl Notifier for NotificationService {
    fn notify(&self, notification: &EventNotification) -> Result<()> {
        log::debug!(
            "Posting notification for event {} on {}",
            notification.event_id,
            NOTIFICATION_CHANNEL.id
        );
        self.show_simple(&notification.summary, &notification.body)
    }
}
