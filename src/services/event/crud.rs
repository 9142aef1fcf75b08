use super::shared::{row_to_event, EVENT_COLUMNS};
use super::EventService;
use crate::models::event::Event;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use rusqlite::{self, params};

impl<'a> EventService<'a> {
    /// Insert a new event and return it with its assigned id.
    ///
    /// Title validation is the caller's concern; the store accepts any row.
    pub fn create(&self, mut event: Event) -> Result<Event> {
        let now = Local::now();
        let now_str = now.to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO events (
                    title, description, target_datetime, target_epoch_ms, color,
                    background_image, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    event.title,
                    event.description,
                    event.target.to_rfc3339(),
                    event.target.timestamp_millis(),
                    event.color,
                    event.background_image,
                    &now_str,
                    &now_str,
                ],
            )
            .context("Failed to insert event")?;

        let id = self.conn.last_insert_rowid();
        log::debug!("Inserted event {} ({})", id, event.title);

        event.id = Some(id);
        event.created_at = Some(now);
        event.updated_at = Some(now);

        Ok(event)
    }

    /// Retrieve an event by ID.
    pub fn get(&self, id: i64) -> Result<Option<Event>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM events WHERE id = ? LIMIT 1", EVENT_COLUMNS),
            [id],
            row_to_event,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).context(format!("Failed to load event {}", id)),
        }
    }

    /// Insert the event when it has no id (or an unknown one), otherwise
    /// overwrite the stored row.
    pub fn upsert(&self, event: &Event) -> Result<Event> {
        match event.id {
            Some(id) if self.get(id)?.is_some() => {
                self.update(event)?;
                self.get(id)?
                    .ok_or_else(|| anyhow!("Event with id {} vanished during upsert", id))
            }
            Some(id) => {
                let now = Local::now();
                let now_str = now.to_rfc3339();
                self.conn
                    .execute(
                        "INSERT INTO events (
                            id, title, description, target_datetime, target_epoch_ms, color,
                            background_image, created_at, updated_at
                        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                        params![
                            id,
                            event.title,
                            event.description,
                            event.target.to_rfc3339(),
                            event.target.timestamp_millis(),
                            event.color,
                            event.background_image,
                            &now_str,
                            &now_str,
                        ],
                    )
                    .context("Failed to insert event")?;

                let mut inserted = event.clone();
                inserted.created_at = Some(now);
                inserted.updated_at = Some(now);
                Ok(inserted)
            }
            None => self.create(event.clone()),
        }
    }

    /// Update an existing event.
    pub fn update(&self, event: &Event) -> Result<()> {
        let id = event
            .id
            .ok_or_else(|| anyhow!("Event ID is required for update"))?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE events SET
                    title = ?, description = ?, target_datetime = ?, target_epoch_ms = ?,
                    color = ?, background_image = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    event.title,
                    event.description,
                    event.target.to_rfc3339(),
                    event.target.timestamp_millis(),
                    event.color,
                    event.background_image,
                    Local::now().to_rfc3339(),
                    id,
                ],
            )
            .context("Failed to update event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        log::debug!("Updated event {}", id);
        Ok(())
    }

    /// Delete an event by ID.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM events WHERE id = ?", [id])
            .context("Failed to delete event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        log::debug!("Deleted event {}", id);
        Ok(())
    }
}
