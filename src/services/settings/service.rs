use std::collections::HashMap;

use crate::models::settings::{Settings, ThemePreference};
use crate::services::database::Database;
use anyhow::{anyhow, Context, Result};

use super::mapper::{
    pairs_to_settings, settings_to_pairs, LANGUAGE_KEY, ONBOARDING_COMPLETED_KEY, THEME_KEY,
};

/// Key/value preference persistence.
pub struct SettingsService<'a> {
    db: &'a Database,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the current settings
    pub fn get(&self) -> Result<Settings> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare("SELECT key, value FROM preferences")
            .context("Failed to prepare settings query")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<HashMap<_, _>>>()
            .context("Failed to load settings")?;

        Ok(pairs_to_settings(&pairs))
    }

    /// Update settings
    pub fn update(&self, settings: &Settings) -> Result<()> {
        if settings.language.trim().is_empty() {
            return Err(anyhow!("Invalid settings: language cannot be empty"));
        }

        for (key, value) in settings_to_pairs(settings) {
            self.put(key, &value)?;
        }
        Ok(())
    }

    pub fn set_theme(&self, theme: ThemePreference) -> Result<()> {
        self.put(THEME_KEY, theme.as_str())
    }

    pub fn set_language(&self, language: &str) -> Result<()> {
        if language.trim().is_empty() {
            return Err(anyhow!("Invalid settings: language cannot be empty"));
        }
        self.put(LANGUAGE_KEY, language.trim())
    }

    pub fn set_onboarding_completed(&self, completed: bool) -> Result<()> {
        self.put(ONBOARDING_COMPLETED_KEY, if completed { "1" } else { "0" })
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.db
            .connection()
            .execute("DELETE FROM preferences", [])
            .context("Failed to reset settings")?;
        Ok(())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .with_context(|| format!("Failed to save preference {}", key))?;
        log::debug!("Saved preference {} = {}", key, value);
        Ok(())
    }
}
