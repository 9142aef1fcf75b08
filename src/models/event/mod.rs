// Event module
// User-owned countdown event model

use chrono::{DateTime, Local};
use thiserror::Error;

/// Color given to events created by hand.
pub const DEFAULT_EVENT_COLOR: &str = "#0000FF";

/// Color given to events seeded from public holidays (blue at 70% alpha).
pub const HOLIDAY_EVENT_COLOR: &str = "#0000FFB3";

/// Reasons an event cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventValidationError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Color must be in hex format (#RGB, #RRGGBB or #RRGGBBAA), got {0:?}")]
    InvalidColor(String),
}

/// A countdown event. `id` stays `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub target: DateTime<Local>,
    pub color: String,
    pub background_image: Option<String>,
    pub created_at: Option<DateTime<Local>>,
    pub updated_at: Option<DateTime<Local>>,
}

impl Event {
    /// Create an unsaved event with an empty description and the default color.
    ///
    /// No validation happens here; callers that gate saving use [`Event::can_save`].
    ///
    /// # Examples
    /// ```
    /// use event_countdown::models::event::Event;
    /// use chrono::{Duration, Local};
    ///
    /// let event = Event::new("Launch", Local::now() + Duration::days(3));
    /// assert!(event.id.is_none());
    /// assert!(event.can_save());
    /// ```
    pub fn new(title: impl Into<String>, target: DateTime<Local>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            target,
            color: DEFAULT_EVENT_COLOR.to_string(),
            background_image: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }

        if !is_hex_color(&self.color) {
            return Err(EventValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }

    /// Whether the save action should be enabled for this event.
    pub fn can_save(&self) -> bool {
        self.validate().is_ok()
    }

    /// An event is past once its target instant has been reached.
    pub fn is_past(&self, now: DateTime<Local>) -> bool {
        self.target <= now
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    title: Option<String>,
    description: String,
    target: Option<DateTime<Local>>,
    color: Option<String>,
    background_image: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn target(mut self, target: DateTime<Local>) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the event color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn background_image(mut self, path: impl Into<String>) -> Self {
        self.background_image = Some(path.into());
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, String> {
        let title = self.title.ok_or("Event title is required")?;
        let target = self.target.ok_or("Event target time is required")?;

        let event = Event {
            id: None,
            title,
            description: self.description,
            target,
            color: self.color.unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
            background_image: self.background_image,
            created_at: None,
            updated_at: None,
        };

        event.validate().map_err(|e| e.to_string())?;
        Ok(event)
    }
}
