use chrono::{DateTime, Local};
use event_countdown::models::event::Event;
use event_countdown::models::holiday::Holiday;
use event_countdown::services::countdown::{compute_remaining, CountdownSnapshot};
use event_countdown::utils::date::{format_full_date, format_time};

const BAR_WIDTH: usize = 20;

pub fn progress_bar(progress: f32) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn event_line(event: &Event, now: DateTime<Local>) -> String {
    let remaining = compute_remaining(event.target, now);
    format!(
        "{:>5}  {:<32} {:>18} {:>6}  {}",
        event.id.map(|id| id.to_string()).unwrap_or_default(),
        truncate(&event.title, 32),
        format_full_date(event.target),
        format_time(event.target),
        remaining.label()
    )
}

pub fn event_details(event: &Event, now: DateTime<Local>) -> String {
    let remaining = compute_remaining(event.target, now);
    let mut out = String::new();
    out.push_str(&format!("{}\n", event.title));
    if !event.description.is_empty() {
        out.push_str(&format!("{}\n", event.description));
    }
    out.push_str(&format!(
        "{} at {}\n",
        format_full_date(event.target),
        format_time(event.target)
    ));
    if remaining.is_past {
        out.push_str("Completed\n");
    } else {
        out.push_str(&format!("{} remaining\n", remaining));
    }
    out.push_str(&format!(
        "{} {:.0}%\n",
        progress_bar(remaining.progress),
        remaining.progress * 100.0
    ));
    if let Some(image) = &event.background_image {
        out.push_str(&format!("Background: {}\n", image));
    }
    out
}

pub fn snapshot_line(snapshot: &CountdownSnapshot) -> String {
    format!(
        "{:<32} {:>16}  {}",
        truncate(&snapshot.title, 32),
        if snapshot.remaining.is_past {
            "Completed".to_string()
        } else {
            snapshot.remaining.to_string()
        },
        progress_bar(snapshot.remaining.progress)
    )
}

/// One row of the holiday list: date, English name, then the local name.
pub fn holiday_line(holiday: &Holiday) -> String {
    let date = holiday
        .parse_date()
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| holiday.date.clone());
    format!(
        "{:>18}  {:<32} {}",
        date,
        truncate(&holiday.name, 32),
        holiday.local_name
    )
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
