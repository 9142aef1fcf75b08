use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::Connection;

use super::queue::NotificationQueue;
use super::{EventNotification, Notifier};
use crate::services::event::EventService;

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    /// Jobs whose event no longer exists.
    pub skipped: usize,
    pub failed: usize,
}

impl DispatchReport {
    pub fn total(&self) -> usize {
        self.delivered + self.skipped + self.failed
    }
}

/// Fire every job due at `now`.
///
/// The event is re-read so the notification shows its current title; jobs
/// for deleted events are dropped without notifying.
pub fn dispatch_due(
    conn: &Connection,
    now: DateTime<Local>,
    notifier: &dyn Notifier,
) -> Result<DispatchReport> {
    let due = NotificationQueue::new(conn).take_due(now)?;
    let events = EventService::new(conn);
    let mut report = DispatchReport::default();

    for job in due {
        let event = match events.get(job.event_id) {
            Ok(Some(event)) => event,
            Ok(None) => {
                log::info!(
                    "Event {} was deleted before {} fired; skipping",
                    job.event_id,
                    job.key
                );
                report.skipped += 1;
                continue;
            }
            Err(err) => {
                log::error!("Failed to load event {} for {}: {:#}", job.event_id, job.key, err);
                report.failed += 1;
                continue;
            }
        };

        if event.title != job.event_title {
            log::debug!(
                "Event {} was renamed since scheduling ({:?} -> {:?})",
                job.event_id,
                job.event_title,
                event.title
            );
        }

        let notification = EventNotification::event_time(job.event_id, &event.title);
        match notifier.notify(&notification) {
            Ok(()) => {
                log::info!("Notification shown for event {}", job.event_id);
                report.delivered += 1;
            }
            Err(err) => {
                log::error!("Notification failed for event {}: {:#}", job.event_id, err);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Event;
    use crate::services::database::Database;
    use crate::services::notification::{decide_schedule, MockNotifier, ScheduleDecision};
    use anyhow::anyhow;
    use chrono::Duration;
    use mockall::predicate::eq;

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn schedule(db: &Database, event: &Event, now: DateTime<Local>) {
        let decision = decide_schedule(event.id.unwrap(), &event.title, event.target, now);
        assert!(matches!(decision, ScheduleDecision::Schedule(_)));
        NotificationQueue::new(db.connection())
            .enact(&decision, now)
            .unwrap();
    }

    #[test]
    fn test_delivers_with_current_title() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());
        let now = Local::now();

        let mut event = service
            .create(Event::new("Old name", now + Duration::seconds(5)))
            .unwrap();
        schedule(&db, &event, now);

        event.title = "New name".to_string();
        service.update(&event).unwrap();

        let id = event.id.unwrap();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(EventNotification::event_time(id, "New name")))
            .times(1)
            .returning(|_| Ok(()));

        let report = dispatch_due(db.connection(), now + Duration::seconds(5), &notifier).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_deleted_event_is_a_no_op() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());
        let now = Local::now();

        let event = service
            .create(Event::new("Cancelled", now + Duration::seconds(1)))
            .unwrap();
        schedule(&db, &event, now);
        service.delete(event.id.unwrap()).unwrap();

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let report = dispatch_due(db.connection(), now + Duration::seconds(2), &notifier).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.delivered, 0);
    }

    #[test]
    fn test_notifier_failure_does_not_stop_batch() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());
        let now = Local::now();

        for title in ["One", "Two"] {
            let event = service
                .create(Event::new(title, now + Duration::seconds(1)))
                .unwrap();
            schedule(&db, &event, now);
        }

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(2)
            .returning(|n| {
                if n.body.starts_with("One") {
                    Err(anyhow!("no notification daemon"))
                } else {
                    Ok(())
                }
            });

        let report = dispatch_due(db.connection(), now + Duration::seconds(1), &notifier).unwrap();
        assert_eq!(report, DispatchReport { delivered: 1, skipped: 0, failed: 1 });
    }

    #[test]
    fn test_nothing_due() {
        let db = setup_test_db();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let report = dispatch_due(db.connection(), Local::now(), &notifier).unwrap();
        assert_eq!(report, DispatchReport::default());
    }
}
