// Property-based tests for countdown arithmetic and notification scheduling
// Checks the decomposition and scheduling rules with random offsets

use chrono::{Duration, Local};
use event_countdown::services::countdown::{
    compute_remaining, remaining_from_millis, TimeRemaining, MILLIS_PER_DAY, MILLIS_PER_HOUR,
    MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};
use event_countdown::services::notification::{decide_schedule, notification_key, ScheduleDecision};
use proptest::prelude::*;

/// Up to roughly 30 years either side of now.
const SPAN_MS: i64 = 30 * 365 * MILLIS_PER_DAY;

proptest! {
    /// Property: anything at or before now is reported as past with zero units
    #[test]
    fn prop_due_or_past_is_zero(diff in -SPAN_MS..=0i64) {
        prop_assert_eq!(remaining_from_millis(diff), TimeRemaining::PAST);
    }

    /// Property: the unit fields recompose the remaining time to the second
    #[test]
    fn prop_units_recompose_remaining(diff in 1..SPAN_MS) {
        let left = remaining_from_millis(diff);

        prop_assert!(!left.is_past);
        prop_assert_eq!(left.remaining_ms, diff);
        prop_assert_eq!(left.total_seconds(), diff / MILLIS_PER_SECOND);

        let recomposed = left.days * MILLIS_PER_DAY
            + left.hours * MILLIS_PER_HOUR
            + left.minutes * MILLIS_PER_MINUTE
            + left.seconds * MILLIS_PER_SECOND;
        prop_assert!(diff - recomposed < MILLIS_PER_SECOND);
    }

    /// Property: each unit stays below the next one up
    #[test]
    fn prop_units_within_bounds(diff in 1..SPAN_MS) {
        let left = remaining_from_millis(diff);

        prop_assert!(left.days >= 0);
        prop_assert!((0..24).contains(&left.hours));
        prop_assert!((0..60).contains(&left.minutes));
        prop_assert!((0..60).contains(&left.seconds));
    }

    /// Property: progress is always a fraction
    #[test]
    fn prop_progress_is_fraction(diff in -SPAN_MS..SPAN_MS) {
        let progress = remaining_from_millis(diff).progress;
        prop_assert!((0.0..=1.0).contains(&progress));
    }

    /// Property: within the last day, progress rises as the event nears
    #[test]
    fn prop_progress_rises_in_final_day(a in 1..MILLIS_PER_DAY, b in 1..MILLIS_PER_DAY) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(remaining_from_millis(near).progress >= remaining_from_millis(far).progress);
    }

    /// Property: computing from two instants matches the raw difference
    #[test]
    fn prop_instants_match_difference(diff in -SPAN_MS..SPAN_MS) {
        let now = Local::now();
        let target = now + Duration::milliseconds(diff);
        prop_assert_eq!(compute_remaining(target, now), remaining_from_millis(diff));
    }

    /// Property: a future event is scheduled with a delay equal to its lead time
    #[test]
    fn prop_schedule_delay_matches_lead_time(id in 1..i64::MAX, diff in 1..SPAN_MS) {
        let now = Local::now();
        let target = now + Duration::milliseconds(diff);

        match decide_schedule(id, "Event", target, now) {
            ScheduleDecision::Schedule(job) => {
                prop_assert_eq!(job.delay.as_millis() as i64, diff);
                prop_assert_eq!(job.key, notification_key(id));
                prop_assert_eq!(job.payload.event_id, id);
            }
            ScheduleDecision::Skip => prop_assert!(false, "future event was skipped"),
        }
    }

    /// Property: nothing is scheduled for an event that is due or past
    #[test]
    fn prop_past_events_are_skipped(id in 1..i64::MAX, diff in -SPAN_MS..=0i64) {
        let now = Local::now();
        let target = now + Duration::milliseconds(diff);
        prop_assert_eq!(decide_schedule(id, "Event", target, now), ScheduleDecision::Skip);
    }
}
