use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveTime, TimeZone};

use crate::models::event::{Event, HOLIDAY_EVENT_COLOR};
use crate::models::holiday::Holiday;

/// Local time of day that seeded holiday events count down to.
pub const HOLIDAY_ANCHOR_TIME: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => panic!("invalid holiday anchor time"),
};

/// Target instant for a holiday: its date at `anchor`, local time.
///
/// Returns `None` for an unparseable date, or when the anchor falls in a
/// gap that does not exist on that local day.
pub fn holiday_target(holiday: &Holiday, anchor: NaiveTime) -> Option<DateTime<Local>> {
    let date = match holiday.parse_date() {
        Ok(date) => date,
        Err(err) => {
            log::warn!("Skipping holiday {:?}: {}", holiday.name, err);
            return None;
        }
    };

    let target = Local.from_local_datetime(&date.and_time(anchor)).earliest();
    if target.is_none() {
        log::warn!(
            "Skipping holiday {:?}: {} {} does not exist in the local time zone",
            holiday.name,
            date,
            anchor
        );
    }
    target
}

pub fn holiday_description(holiday: &Holiday) -> String {
    format!("Public Holiday: {}", holiday.local_name)
}

/// Holidays from `holidays` that are not yet present in `existing`, as new
/// unsaved events anchored at [`HOLIDAY_ANCHOR_TIME`].
pub fn select_new_holiday_events(holidays: &[Holiday], existing: &[Event]) -> Vec<Event> {
    select_new_holiday_events_at(holidays, existing, HOLIDAY_ANCHOR_TIME)
}

/// Like [`select_new_holiday_events`] with an explicit anchor time.
///
/// A holiday counts as already seeded when some event has the same title and
/// the same target instant. Repeats inside `holidays` are emitted once.
pub fn select_new_holiday_events_at(
    holidays: &[Holiday],
    existing: &[Event],
    anchor: NaiveTime,
) -> Vec<Event> {
    let mut seen: HashSet<(String, i64)> = existing
        .iter()
        .map(|event| (event.title.clone(), event.target.timestamp_millis()))
        .collect();

    let mut seeded = Vec::new();
    for holiday in holidays {
        let Some(target) = holiday_target(holiday, anchor) else {
            continue;
        };

        if !seen.insert((holiday.name.clone(), target.timestamp_millis())) {
            continue;
        }

        let mut event = Event::new(holiday.name.clone(), target);
        event.description = holiday_description(holiday);
        event.color = HOLIDAY_EVENT_COLOR.to_string();
        seeded.push(event);
    }

    seeded
}
