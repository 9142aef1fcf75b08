//! Time-remaining arithmetic for countdown displays.
//!
//! Everything here is pure: the caller supplies both instants, so the same
//! inputs always give the same [`TimeRemaining`].

use std::fmt;

use chrono::{DateTime, Local};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60_000;
pub const MILLIS_PER_HOUR: i64 = 3_600_000;
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Remaining time until an event, decomposed into display units.
///
/// `progress` rises towards 1.0 as the event approaches:
///
/// | remaining            | progress                      |
/// |----------------------|-------------------------------|
/// | more than 7 days     | 0.25                          |
/// | more than 3 days     | 0.5                           |
/// | at least 1 day       | 0.75                          |
/// | under 1 day          | share of the final day gone   |
/// | due or past          | 1.0                           |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRemaining {
    pub remaining_ms: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_past: bool,
    pub progress: f32,
}

impl TimeRemaining {
    /// The value reported once an event is due.
    pub const PAST: TimeRemaining = TimeRemaining {
        remaining_ms: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        is_past: true,
        progress: 1.0,
    };

    /// Whole seconds represented by the unit fields.
    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    /// Compact card text, e.g. `3d 4h`, `2h 5m`, `4m 10s` or `Completed`.
    pub fn label(&self) -> String {
        if self.is_past {
            "Completed".to_string()
        } else if self.days > 0 {
            format!("{}d {}h", self.days, self.hours)
        } else if self.hours > 0 {
            format!("{}h {}m", self.hours, self.minutes)
        } else {
            format!("{}m {}s", self.minutes, self.seconds)
        }
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Compute the time left between `now` and `target`.
///
/// # Examples
/// ```
/// use chrono::{Duration, Local};
/// use event_countdown::services::countdown::compute_remaining;
///
/// let now = Local::now();
/// let left = compute_remaining(now + Duration::milliseconds(90_061_000), now);
/// assert_eq!((left.days, left.hours, left.minutes, left.seconds), (1, 1, 1, 1));
/// ```
pub fn compute_remaining(target: DateTime<Local>, now: DateTime<Local>) -> TimeRemaining {
    let diff = target.timestamp_millis() - now.timestamp_millis();
    remaining_from_millis(diff)
}

/// Same as [`compute_remaining`] but from a signed millisecond difference.
pub fn remaining_from_millis(diff: i64) -> TimeRemaining {
    if diff <= 0 {
        return TimeRemaining::PAST;
    }

    let days = diff / MILLIS_PER_DAY;

    TimeRemaining {
        remaining_ms: diff,
        days,
        hours: (diff / MILLIS_PER_HOUR) % 24,
        minutes: (diff / MILLIS_PER_MINUTE) % 60,
        seconds: (diff / MILLIS_PER_SECOND) % 60,
        is_past: false,
        progress: bucketed_progress(days, diff),
    }
}

fn bucketed_progress(days: i64, diff: i64) -> f32 {
    match days {
        d if d > 7 => 0.25,
        d if d > 3 => 0.5,
        d if d > 0 => 0.75,
        _ => {
            let fraction = 1.0 - diff as f64 / MILLIS_PER_DAY as f64;
            fraction.clamp(0.0, 1.0) as f32
        }
    }
}
