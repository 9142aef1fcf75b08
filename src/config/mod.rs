//! Application configuration loaded from `config.toml`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveTime;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::services::holiday::{DEFAULT_HOLIDAY_API_BASE_URL, HOLIDAY_ANCHOR_TIME};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "EVENT_COUNTDOWN_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    pub holidays: HolidayConfig,
    pub countdown: CountdownConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HolidayConfig {
    pub api_base_url: String,
    pub country_code: String,
    /// Local time of day seeded holiday events count down to (`HH:MM`).
    pub anchor_time: String,
    /// Seed holiday events whenever holidays are fetched.
    pub auto_seed: bool,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_HOLIDAY_API_BASE_URL.to_string(),
            country_code: "EG".to_string(),
            anchor_time: HOLIDAY_ANCHOR_TIME.format("%H:%M").to_string(),
            auto_seed: true,
        }
    }
}

impl HolidayConfig {
    pub fn anchor(&self) -> Result<NaiveTime> {
        let value = self.anchor_time.trim();
        NaiveTime::parse_from_str(value, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
            .map_err(|_| anyhow!("Invalid holidays.anchor_time {:?}: expected HH:MM", value))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CountdownConfig {
    pub tick_interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

impl CountdownConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "EventCountdown", "EventCountdown")
}

/// Get the config file path, honouring [`CONFIG_PATH_ENV`].
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Directory for the database and imported images.
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not determine config directory; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {:?}; using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.holidays.anchor()?;
        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir().join("events.db"))
    }

    pub fn image_dir(&self) -> PathBuf {
        self.image_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("images"))
    }
}
