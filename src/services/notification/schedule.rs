use std::time::Duration;

use chrono::{DateTime, Local};

/// Key under which an event's notification job is stored. One key per event.
pub fn notification_key(event_id: i64) -> String {
    format!("event_notification_{}", event_id)
}

/// Data carried by a scheduled job until it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub event_id: i64,
    pub event_title: String,
}

/// A one-shot job to run `delay` after it was scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub key: String,
    pub delay: Duration,
    pub payload: NotificationPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// The event is already due or past.
    Skip,
    Schedule(ScheduledNotification),
}

/// Decide whether an event needs a notification job, and with what delay.
///
/// # Examples
/// ```
/// use chrono::{Duration, Local};
/// use event_countdown::services::notification::{decide_schedule, ScheduleDecision};
///
/// let now = Local::now();
/// assert_eq!(decide_schedule(1, "Past", now, now), ScheduleDecision::Skip);
/// ```
pub fn decide_schedule(
    event_id: i64,
    event_title: &str,
    target: DateTime<Local>,
    now: DateTime<Local>,
) -> ScheduleDecision {
    let delay_ms = target.timestamp_millis() - now.timestamp_millis();
    if delay_ms <= 0 {
        return ScheduleDecision::Skip;
    }

    ScheduleDecision::Schedule(ScheduledNotification {
        key: notification_key(event_id),
        delay: Duration::from_millis(delay_ms as u64),
        payload: NotificationPayload {
            event_id,
            event_title: event_title.to_string(),
        },
    })
}
