// Date utility functions
// Parsing of user-entered date/times and display formatting

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a local date/time typed by the user.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]`, the same with a `T` separator, or a bare
/// `YYYY-MM-DD`, which is placed at `date_only_time`.
pub fn parse_user_datetime(input: &str, date_only_time: NaiveTime) -> Result<DateTime<Local>> {
    let value = input.trim();

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(date_only_time))
        })
        .ok_or_else(|| {
            anyhow!(
                "Invalid date/time {:?}: expected YYYY-MM-DD HH:MM or YYYY-MM-DD",
                value
            )
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("{} does not exist in the local time zone", naive))
}

/// e.g. "March 1, 2025"
pub fn format_full_date(date: DateTime<Local>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// e.g. "9:05"
pub fn format_time(date: DateTime<Local>) -> String {
    date.format("%-H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use test_case::test_case;

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    #[test_case("2025-03-01 18:45", 18, 45, 0; "space separated")]
    #[test_case("2025-03-01T18:45:30", 18, 45, 30; "iso with seconds")]
    #[test_case("  2025-03-01 07:05:00 ", 7, 5, 0; "surrounding whitespace")]
    #[test_case("2025-03-01", 9, 0, 0; "date only uses default time")]
    fn test_parse_user_datetime(input: &str, hour: u32, minute: u32, second: u32) {
        let parsed = parse_user_datetime(input, nine()).unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (hour, minute, second));
    }

    #[test_case("tomorrow"; "words")]
    #[test_case("01/03/2025"; "slashes")]
    #[test_case("2025-13-01"; "bad month")]
    fn test_parse_user_datetime_rejects(input: &str) {
        assert!(parse_user_datetime(input, nine()).is_err());
    }

    #[test]
    fn test_formatting() {
        let date = parse_user_datetime("2025-03-01 09:05", nine()).unwrap();
        assert_eq!(format_full_date(date), "March 1, 2025");
        assert_eq!(format_time(date), "9:05");
    }
}
