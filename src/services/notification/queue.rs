use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use rusqlite::{params, Connection, Row};

use super::schedule::{notification_key, ScheduleDecision, ScheduledNotification};

/// A job waiting in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    pub key: String,
    pub event_id: i64,
    pub event_title: String,
    pub fire_at: DateTime<Local>,
}

/// One-shot deferred notification jobs persisted in SQLite, keyed so that a
/// second schedule for the same key replaces the first.
pub struct NotificationQueue<'a> {
    conn: &'a Connection,
}

impl<'a> NotificationQueue<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Enqueue `job` to fire `job.delay` after `now`, replacing any pending
    /// job under the same key.
    pub fn schedule_once(&self, job: &ScheduledNotification, now: DateTime<Local>) -> Result<()> {
        let delay_ms =
            i64::try_from(job.delay.as_millis()).context("Notification delay too large")?;
        let fire_at_ms = now.timestamp_millis().saturating_add(delay_ms);

        self.conn
            .execute(
                "INSERT INTO scheduled_notifications (job_key, event_id, event_title, fire_at_ms)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(job_key) DO UPDATE SET
                    event_id = excluded.event_id,
                    event_title = excluded.event_title,
                    fire_at_ms = excluded.fire_at_ms,
                    created_at = CURRENT_TIMESTAMP",
                params![
                    job.key,
                    job.payload.event_id,
                    job.payload.event_title,
                    fire_at_ms
                ],
            )
            .with_context(|| format!("Failed to schedule notification {}", job.key))?;

        log::info!(
            "Scheduled notification {} for event {} in {} ms",
            job.key,
            job.payload.event_id,
            delay_ms
        );
        Ok(())
    }

    /// Carry out a scheduling decision. Returns whether a job was enqueued.
    pub fn enact(&self, decision: &ScheduleDecision, now: DateTime<Local>) -> Result<bool> {
        match decision {
            ScheduleDecision::Skip => {
                log::debug!("Event time is not in the future, not scheduling");
                Ok(false)
            }
            ScheduleDecision::Schedule(job) => {
                self.schedule_once(job, now)?;
                Ok(true)
            }
        }
    }

    /// Remove the pending job under `key`. Returns whether one existed.
    pub fn cancel(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM scheduled_notifications WHERE job_key = ?1", [key])
            .with_context(|| format!("Failed to cancel notification {}", key))?;

        if removed > 0 {
            log::info!("Cancelled notification {}", key);
        }
        Ok(removed > 0)
    }

    pub fn cancel_for_event(&self, event_id: i64) -> Result<bool> {
        self.cancel(&notification_key(event_id))
    }

    /// All pending jobs, soonest first.
    pub fn pending(&self) -> Result<Vec<PendingNotification>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT job_key, event_id, event_title, fire_at_ms
                 FROM scheduled_notifications ORDER BY fire_at_ms ASC, job_key ASC",
            )
            .context("Failed to prepare pending notification query")?;

        let jobs = stmt
            .query_map([], row_to_pending)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read pending notifications")?;
        Ok(jobs)
    }

    /// Remove and return every job whose fire time is at or before `now`.
    pub fn take_due(&self, now: DateTime<Local>) -> Result<Vec<PendingNotification>> {
        let now_ms = now.timestamp_millis();
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin notification transaction")?;

        let due = {
            let mut stmt = tx.prepare(
                "SELECT job_key, event_id, event_title, fire_at_ms
                 FROM scheduled_notifications WHERE fire_at_ms <= ?1
                 ORDER BY fire_at_ms ASC, job_key ASC",
            )?;
            let rows = stmt
                .query_map([now_ms], row_to_pending)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        tx.execute(
            "DELETE FROM scheduled_notifications WHERE fire_at_ms <= ?1",
            [now_ms],
        )
        .context("Failed to remove due notifications")?;
        tx.commit().context("Failed to commit due notifications")?;

        Ok(due)
    }
}

fn row_to_pending(row: &Row) -> rusqlite::Result<PendingNotification> {
    let fire_at_ms: i64 = row.get(3)?;
    let fire_at = Local
        .timestamp_millis_opt(fire_at_ms)
        .single()
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(3, fire_at_ms))?;

    Ok(PendingNotification {
        key: row.get(0)?,
        event_id: row.get(1)?,
        event_title: row.get(2)?,
        fire_at,
    })
}
