// Test fixtures - reusable test data
// Provides consistent events, holidays and stores across the test files

#![allow(dead_code)]

use std::cell::Cell;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use event_countdown::models::event::Event;
use event_countdown::models::holiday::Holiday;
use event_countdown::services::database::Database;
use event_countdown::services::holiday::{HolidaySource, HOLIDAY_ANCHOR_TIME};
use tempfile::TempDir;

/// Sample instants for testing
pub mod dates {
    use super::*;

    /// Local instant for a calendar day at the holiday anchor time.
    pub fn at_anchor(year: i32, month: u32, day: u32) -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_time(HOLIDAY_ANCHOR_TIME);
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    /// Far enough ahead that no test run ever sees it as past.
    pub fn far_future() -> DateTime<Local> {
        Local::now() + Duration::days(3650)
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub fn upcoming(title: &str, days_ahead: i64) -> Event {
        Event::new(title, Local::now() + Duration::days(days_ahead))
    }

    pub fn past(title: &str, days_ago: i64) -> Event {
        Event::new(title, Local::now() - Duration::days(days_ago))
    }
}

/// Sample holidays for testing
pub mod holidays {
    use super::*;

    pub fn founders_day() -> Holiday {
        Holiday::new("2025-03-01", "Founders' Day", "Founders' Day", "EG")
    }

    pub fn far_future_year() -> Vec<Holiday> {
        vec![
            Holiday::new("2099-01-01", "New Year", "New Year's Day", "EG"),
            Holiday::new("2099-07-23", "Revolution Day", "Revolution Day", "EG"),
        ]
    }
}

/// A database file in a fresh temporary directory, removed on drop.
pub struct TestStore {
    pub db: Database,
    _dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        db.initialize_schema().unwrap();
        Self { db, _dir: dir }
    }
}

/// Holiday source that serves a fixed list and counts calls.
pub struct StaticHolidays {
    pub holidays: Vec<Holiday>,
    pub calls: Cell<usize>,
}

impl StaticHolidays {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self {
            holidays,
            calls: Cell::new(0),
        }
    }
}

impl HolidaySource for StaticHolidays {
    fn fetch_holidays(&self, _year: i32, _country_code: &str) -> Result<Vec<Holiday>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.holidays.clone())
    }
}

/// Holiday source whose every fetch fails.
pub struct UnreachableHolidays;

impl HolidaySource for UnreachableHolidays {
    fn fetch_holidays(&self, _year: i32, _country_code: &str) -> Result<Vec<Holiday>> {
        Err(anyhow!("connection refused"))
    }
}
