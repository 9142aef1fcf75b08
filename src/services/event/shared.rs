use chrono::{DateTime, Local};
use rusqlite::{self, Result, Row};

use crate::models::event::Event;

pub(crate) const EVENT_COLUMNS: &str = "id, title, description, target_datetime, color, \
     background_image, created_at, updated_at";

pub(crate) fn to_local_datetime(value: String) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Rows written with SQLite's `CURRENT_TIMESTAMP` default are not RFC 3339,
/// so bookkeeping timestamps are read leniently.
fn to_optional_local_datetime(value: Option<String>) -> Option<DateTime<Local>> {
    value.and_then(|v| to_local_datetime(v).ok())
}

pub(crate) fn row_to_event(row: &Row) -> Result<Event> {
    Ok(Event {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        description: row.get(2)?,
        target: to_local_datetime(row.get::<_, String>(3)?)?,
        color: row.get(4)?,
        background_image: row.get(5)?,
        created_at: to_optional_local_datetime(row.get(6)?),
        updated_at: to_optional_local_datetime(row.get(7)?),
    })
}
