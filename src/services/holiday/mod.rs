//! Public holidays: remote fetch and conversion into countdown events.

mod fetcher;
mod seeding;

use anyhow::Result;

use crate::models::holiday::Holiday;

pub use fetcher::{NagerHolidayFetcher, DEFAULT_HOLIDAY_API_BASE_URL};
pub use seeding::{
    holiday_description, holiday_target, select_new_holiday_events, select_new_holiday_events_at,
    HOLIDAY_ANCHOR_TIME,
};

/// Anything that can list the public holidays of a country for a year.
#[cfg_attr(test, mockall::automock)]
pub trait HolidaySource {
    fn fetch_holidays(&self, year: i32, country_code: &str) -> Result<Vec<Holiday>>;
}
