// Unit tests for event color validation
// Covers the hex formats accepted for an event's display color

use chrono::{Duration, Local};
use event_countdown::models::event::{Event, EventValidationError, DEFAULT_EVENT_COLOR};
use test_case::test_case;

fn event_with_color(color: &str) -> Event {
    let mut event = Event::new("Colored", Local::now() + Duration::days(1));
    event.color = color.to_string();
    event
}

#[test_case("#FFF" ; "short rgb")]
#[test_case("#0000FF" ; "rgb")]
#[test_case("#0000FFB3" ; "rgb with alpha")]
#[test_case("#a1b2c3" ; "lowercase")]
fn test_valid_colors_accepted(color: &str) {
    assert!(event_with_color(color).validate().is_ok(), "{} should be valid", color);
}

#[test_case("" ; "empty")]
#[test_case("0000FF" ; "missing hash")]
#[test_case("#00FF" ; "four digits")]
#[test_case("#GGGGGG" ; "not hex")]
#[test_case("#0000FFB3FF" ; "too long")]
#[test_case("blue" ; "named color")]
fn test_invalid_colors_rejected(color: &str) {
    assert_eq!(
        event_with_color(color).validate(),
        Err(EventValidationError::InvalidColor(color.to_string()))
    );
}

#[test]
fn test_default_color_is_valid() {
    assert!(event_with_color(DEFAULT_EVENT_COLOR).can_save());
}
