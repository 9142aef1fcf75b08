//! Event store.
//! SQLite-backed CRUD for countdown events, split into write operations
//! (`crud`) and read queries (`queries`).

use rusqlite::Connection;

pub mod crud;
pub mod queries;
mod shared;

/// Service for managing events stored in SQLite.
pub struct EventService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> EventService<'a> {
    /// Create a new EventService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Event;
    use crate::services::database::Database;
    use chrono::{Duration, Local};
    use pretty_assertions::assert_eq;

    fn setup_test_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn sample_event() -> Event {
        Event::new("Test Event", Local::now() + Duration::days(1))
    }

    fn titles(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_create_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let created = service.create(sample_event()).unwrap();
        assert!(created.id.is_some());
        assert!(created.created_at.is_some());
        assert!(created.updated_at.is_some());
    }

    #[test]
    fn test_create_does_not_enforce_title() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let created = service
            .create(Event::new("", Local::now() + Duration::hours(1)))
            .unwrap();
        assert_eq!(service.get(created.id.unwrap()).unwrap().unwrap().title, "");
    }

    #[test]
    fn test_get_round_trips_fields() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let event = Event::builder()
            .title("Wedding")
            .description("Bring flowers")
            .target(Local::now() + Duration::days(30))
            .color("#FF00AA")
            .background_image("/data/images/wedding.jpg")
            .build()
            .unwrap();

        let created = service.create(event.clone()).unwrap();
        let found = service.get(created.id.unwrap()).unwrap().unwrap();

        assert_eq!(found.title, event.title);
        assert_eq!(found.description, event.description);
        assert_eq!(found.target, event.target);
        assert_eq!(found.color, event.color);
        assert_eq!(found.background_image, event.background_image);
    }

    #[test]
    fn test_get_nonexistent_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        assert!(service.get(999).unwrap().is_none());
    }

    #[test]
    fn test_update_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = service.create(sample_event()).unwrap();
        event.title = "Updated Title".to_string();
        event.description = "New description".to_string();
        service.update(&event).unwrap();

        let updated = service.get(event.id.unwrap()).unwrap().unwrap();
        assert_eq!(updated.title, "Updated Title");
        assert_eq!(updated.description, "New description");
    }

    #[test]
    fn test_update_nonexistent_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.id = Some(999);
        assert!(service.update(&event).is_err());

        event.id = None;
        assert!(service.update(&event).is_err());
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let inserted = service.upsert(&sample_event()).unwrap();
        let id = inserted.id.unwrap();

        let mut edited = inserted.clone();
        edited.title = "Edited".to_string();
        let updated = service.upsert(&edited).unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(service.list_all().unwrap().len(), 1);
        assert_eq!(service.get(id).unwrap().unwrap().title, "Edited");
    }

    #[test]
    fn test_upsert_unknown_id_inserts_with_that_id() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let mut event = sample_event();
        event.id = Some(42);
        service.upsert(&event).unwrap();

        assert!(service.get(42).unwrap().is_some());
    }

    #[test]
    fn test_delete_event() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());

        let id = service.create(sample_event()).unwrap().id.unwrap();
        service.delete(id).unwrap();

        assert!(service.get(id).unwrap().is_none());
        assert!(service.delete(id).is_err());
    }

    #[test]
    fn test_list_all_ordered_by_target() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());
        let now = Local::now();

        service.create(Event::new("Later", now + Duration::days(5))).unwrap();
        service.create(Event::new("Sooner", now + Duration::days(1))).unwrap();
        service.create(Event::new("Earlier", now - Duration::days(1))).unwrap();

        assert_eq!(
            titles(&service.list_all().unwrap()),
            vec!["Earlier", "Sooner", "Later"]
        );
        assert_eq!(
            titles(&service.list_all_once().unwrap()),
            vec!["Later", "Sooner", "Earlier"]
        );
    }

    #[test]
    fn test_upcoming_and_past_partition() {
        let db = setup_test_db();
        let service = EventService::new(db.connection());
        let now = Local::now();

        service.create(Event::new("Yesterday", now - Duration::days(1))).unwrap();
        service.create(Event::new("Last week", now - Duration::days(7))).unwrap();
        service.create(Event::new("Tomorrow", now + Duration::days(1))).unwrap();
        service.create(Event::new("Right now", now)).unwrap();

        assert_eq!(titles(&service.find_upcoming(now).unwrap()), vec!["Tomorrow"]);
        assert_eq!(
            titles(&service.find_past(now).unwrap()),
            vec!["Right now", "Yesterday", "Last week"]
        );
    }
}
