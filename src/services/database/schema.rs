use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_events_table(conn)?;
    run_events_migrations(conn)?;
    create_scheduled_notifications_table(conn)?;
    create_preferences_table(conn)?;
    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            target_datetime TEXT NOT NULL,
            target_epoch_ms INTEGER NOT NULL,
            color TEXT NOT NULL DEFAULT '#0000FF',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create events table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_target ON events(target_epoch_ms)",
        [],
    )
    .context("Failed to create events target index")?;

    Ok(())
}

fn run_events_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "background_image",
        "ALTER TABLE events ADD COLUMN background_image TEXT",
    )?;

    Ok(())
}

fn create_scheduled_notifications_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS scheduled_notifications (
            job_key TEXT PRIMARY KEY,
            event_id INTEGER NOT NULL,
            event_title TEXT NOT NULL,
            fire_at_ms INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create scheduled_notifications table")?;

    Ok(())
}

fn create_preferences_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create preferences table")?;

    Ok(())
}
