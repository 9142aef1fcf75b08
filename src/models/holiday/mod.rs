// Holiday module
// Public holiday records returned by the remote holiday service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid holiday date {value:?}: expected YYYY-MM-DD")]
pub struct HolidayDateError {
    pub value: String,
}

/// A public holiday. Only ever used as a template for seeding events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: String,
    pub local_name: String,
    pub name: String,
    pub country_code: String,
}

impl Holiday {
    pub fn new(
        date: impl Into<String>,
        local_name: impl Into<String>,
        name: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            local_name: local_name.into(),
            name: name.into(),
            country_code: country_code.into(),
        }
    }

    /// Parse the day-granularity date string.
    pub fn parse_date(&self) -> Result<NaiveDate, HolidayDateError> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| HolidayDateError {
            value: self.date.clone(),
        })
    }
}
