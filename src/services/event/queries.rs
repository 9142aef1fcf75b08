use super::shared::{row_to_event, EVENT_COLUMNS};
use super::EventService;
use crate::models::event::Event;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rusqlite::{self, Params};

impl<'a> EventService<'a> {
    /// All events ordered by target instant ascending.
    pub fn list_all(&self) -> Result<Vec<Event>> {
        self.query_events(
            &format!(
                "SELECT {} FROM events ORDER BY target_epoch_ms ASC, id ASC",
                EVENT_COLUMNS
            ),
            [],
        )
    }

    /// Unordered snapshot of the table (insertion order).
    pub fn list_all_once(&self) -> Result<Vec<Event>> {
        self.query_events(
            &format!("SELECT {} FROM events ORDER BY id ASC", EVENT_COLUMNS),
            [],
        )
    }

    /// Events still ahead of `now`, soonest first.
    pub fn find_upcoming(&self, now: DateTime<Local>) -> Result<Vec<Event>> {
        self.query_events(
            &format!(
                "SELECT {} FROM events WHERE target_epoch_ms > ?
                 ORDER BY target_epoch_ms ASC, id ASC",
                EVENT_COLUMNS
            ),
            [now.timestamp_millis()],
        )
    }

    /// Events that are due or over, most recent first.
    pub fn find_past(&self, now: DateTime<Local>) -> Result<Vec<Event>> {
        self.query_events(
            &format!(
                "SELECT {} FROM events WHERE target_epoch_ms <= ?
                 ORDER BY target_epoch_ms DESC, id DESC",
                EVENT_COLUMNS
            ),
            [now.timestamp_millis()],
        )
    }

    fn query_events<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .context("Failed to prepare event query")?;

        let events = stmt
            .query_map(params, row_to_event)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read events")?;

        Ok(events)
    }
}
