//! Presentation-side state for the event screens.
//!
//! [`EventController`] owns the "current value" cells the views render from
//! (event list, holidays, loading flags, last error) and runs every user
//! operation as write, then (re)schedule, then refresh. Failures never
//! propagate: they are logged and surfaced through the `error` cell.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveTime};
use tokio::sync::watch;

use crate::models::event::Event;
use crate::models::holiday::Holiday;
use crate::services::database::Database;
use crate::services::event::EventService;
use crate::services::holiday::{select_new_holiday_events_at, HolidaySource, HOLIDAY_ANCHOR_TIME};
use crate::services::notification::{decide_schedule, NotificationQueue};

pub struct EventController<'a> {
    db: &'a Database,
    holiday_source: Box<dyn HolidaySource + 'a>,
    holiday_anchor: NaiveTime,
    auto_seed_holidays: bool,
    events: watch::Sender<Vec<Event>>,
    holidays: watch::Sender<Vec<Holiday>>,
    loading: watch::Sender<bool>,
    adding_holidays: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
}

impl<'a> EventController<'a> {
    /// Create the controller and load the current event list.
    pub fn new(db: &'a Database, holiday_source: Box<dyn HolidaySource + 'a>) -> Self {
        let controller = Self {
            db,
            holiday_source,
            holiday_anchor: HOLIDAY_ANCHOR_TIME,
            auto_seed_holidays: true,
            events: watch::channel(Vec::new()).0,
            holidays: watch::channel(Vec::new()).0,
            loading: watch::channel(false).0,
            adding_holidays: watch::channel(false).0,
            error: watch::channel(None).0,
        };
        controller.refresh_events();
        controller
    }

    pub fn with_holiday_anchor(mut self, anchor: NaiveTime) -> Self {
        self.holiday_anchor = anchor;
        self
    }

    /// Whether fetched holidays are turned into events straight away.
    pub fn with_auto_seed(mut self, enabled: bool) -> Self {
        self.auto_seed_holidays = enabled;
        self
    }

    pub fn subscribe_events(&self) -> watch::Receiver<Vec<Event>> {
        self.events.subscribe()
    }

    pub fn subscribe_holidays(&self) -> watch::Receiver<Vec<Holiday>> {
        self.holidays.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_adding_holidays(&self) -> watch::Receiver<bool> {
        self.adding_holidays.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// Current event list, ordered by target instant.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn holidays(&self) -> Vec<Holiday> {
        self.holidays.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn is_adding_holidays(&self) -> bool {
        *self.adding_holidays.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    /// Re-read the store and publish the whole list.
    pub fn refresh_events(&self) {
        match EventService::new(self.db.connection()).list_all() {
            Ok(events) => {
                self.events.send_if_modified(|current| {
                    if *current == events {
                        return false;
                    }
                    *current = events;
                    true
                });
            }
            Err(err) => self.fail("Failed to load events", err),
        }
    }

    /// Look up an event in the current list. `None` means "not found".
    pub fn find_event(&self, id: i64) -> Option<Event> {
        self.events.borrow().iter().find(|e| e.id == Some(id)).cloned()
    }

    /// Events still ahead of `now`, soonest first.
    pub fn upcoming_events(&self, now: DateTime<Local>) -> Vec<Event> {
        match EventService::new(self.db.connection()).find_upcoming(now) {
            Ok(events) => events,
            Err(err) => {
                self.fail("Failed to load upcoming events", err);
                Vec::new()
            }
        }
    }

    /// Events that are due or over, most recent first.
    pub fn past_events(&self, now: DateTime<Local>) -> Vec<Event> {
        match EventService::new(self.db.connection()).find_past(now) {
            Ok(events) => events,
            Err(err) => {
                self.fail("Failed to load past events", err);
                Vec::new()
            }
        }
    }

    /// Save a new event and schedule its notification.
    pub fn add_event(&self, event: Event) -> Option<Event> {
        if let Err(err) = event.validate() {
            self.fail("Failed to add event", err.into());
            return None;
        }

        self.loading.send_replace(true);
        let result = self.insert_and_schedule(event);
        self.refresh_events();
        self.loading.send_replace(false);

        match result {
            Ok(event) => Some(event),
            Err(err) => {
                self.fail("Failed to add event", err);
                None
            }
        }
    }

    /// Save changes to an event and replace its pending notification.
    pub fn update_event(&self, event: Event) -> bool {
        if let Err(err) = event.validate() {
            self.fail("Failed to update event", err.into());
            return false;
        }

        self.loading.send_replace(true);
        let result = self.upsert_and_reschedule(&event);
        self.refresh_events();
        self.loading.send_replace(false);

        self.settle("Failed to update event", result)
    }

    /// Delete an event and cancel its pending notification.
    pub fn delete_event(&self, event: &Event) -> bool {
        self.loading.send_replace(true);
        let result = self.delete_and_cancel(event);
        self.refresh_events();
        self.loading.send_replace(false);

        self.settle("Failed to delete event", result)
    }

    /// Fetch holidays into the `holidays` cell and, when enabled, seed them.
    pub fn load_holidays(&self, year: i32, country_code: &str) -> bool {
        match self.holiday_source.fetch_holidays(year, country_code) {
            Ok(holidays) => {
                self.holidays.send_replace(holidays);
                if self.auto_seed_holidays {
                    self.auto_create_holiday_events();
                }
                true
            }
            Err(err) => {
                self.fail("Holiday load failed", err);
                false
            }
        }
    }

    /// Turn the current holidays into events, skipping ones already present.
    /// Returns the number of events created.
    pub fn auto_create_holiday_events(&self) -> usize {
        self.adding_holidays.send_replace(true);

        let mut created = 0;
        if let Err(err) = self.seed_holidays(&mut created) {
            self.fail("Failed to add holidays", err);
        }
        if created > 0 {
            log::info!("Seeded {} holiday events", created);
        }

        self.refresh_events();
        self.adding_holidays.send_replace(false);
        created
    }

    fn seed_holidays(&self, created: &mut usize) -> Result<()> {
        let existing = EventService::new(self.db.connection()).list_all_once()?;
        let holidays = self.holidays();

        for event in select_new_holiday_events_at(&holidays, &existing, self.holiday_anchor) {
            self.insert_and_schedule(event)?;
            *created += 1;
        }
        Ok(())
    }

    fn insert_and_schedule(&self, event: Event) -> Result<Event> {
        let created = EventService::new(self.db.connection()).create(event)?;
        self.schedule_notification(&created)?;
        Ok(created)
    }

    fn upsert_and_reschedule(&self, event: &Event) -> Result<()> {
        let saved = EventService::new(self.db.connection()).upsert(event)?;
        let id = saved.id.ok_or_else(|| anyhow!("Saved event has no id"))?;

        NotificationQueue::new(self.db.connection()).cancel_for_event(id)?;
        self.schedule_notification(&saved)
    }

    fn delete_and_cancel(&self, event: &Event) -> Result<()> {
        let id = event.id.ok_or_else(|| anyhow!("Event has not been saved"))?;

        EventService::new(self.db.connection()).delete(id)?;
        NotificationQueue::new(self.db.connection()).cancel_for_event(id)?;
        Ok(())
    }

    fn schedule_notification(&self, event: &Event) -> Result<()> {
        let id = event
            .id
            .ok_or_else(|| anyhow!("Cannot schedule a notification for an unsaved event"))?;
        let now = Local::now();
        let decision = decide_schedule(id, &event.title, event.target, now);
        NotificationQueue::new(self.db.connection()).enact(&decision, now)?;
        Ok(())
    }

    fn settle(&self, context: &str, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.fail(context, err);
                false
            }
        }
    }

    fn fail(&self, context: &str, err: anyhow::Error) {
        log::error!("{}: {:#}", context, err);
        self.error.send_replace(Some(format!("{}: {:#}", context, err)));
    }
}
