//! Event use-case service.
//!
//! # Responsibility
//! - Provide event CRUD entry points and the event-side cascade flows.
//! - Delegate persistence to the injected repositories.

use crate::model::celebration::Celebration;
use crate::model::event::{Event, EventId};
use crate::repo::celebration_repo::CelebrationRepository;
use crate::repo::event_repo::EventRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::info;

/// Event use-case service over injected repository implementations.
pub struct EventService<E: EventRepository, C: CelebrationRepository> {
    events: E,
    celebrations: C,
}

impl<E: EventRepository, C: CelebrationRepository> EventService<E, C> {
    pub fn new(events: E, celebrations: C) -> Self {
        Self {
            events,
            celebrations,
        }
    }

    /// Returns all stored events.
    pub fn get_all_events(&self) -> RepoResult<Vec<Event>> {
        self.events.find_all()
    }

    /// Fails with `NotFound` when the event does not exist.
    pub fn get_event_by_id(&self, id: EventId) -> RepoResult<Event> {
        self.events.find_by_id(id)
    }

    /// Persists the event, assigning an id when unset.
    pub fn add_event(&self, event: &mut Event) -> RepoResult<EventId> {
        let id = self.events.save(event)?;
        info!("event=event_added module=service id={id}");
        Ok(id)
    }

    /// Returns the celebrations observing the event.
    ///
    /// Fails with `NotFound` when the event does not exist.
    pub fn get_celebrations_by_event_id(&self, event_id: EventId) -> RepoResult<Vec<Celebration>> {
        let celebration_ids = self.events.find_celebration_ids_by_event_id(event_id)?;
        self.celebrations.find_all_by_ids(&celebration_ids)
    }

    /// Returns all events dated exactly on the given date.
    pub fn get_events_by_date(&self, date: NaiveDate) -> RepoResult<Vec<Event>> {
        self.events.find_by_date(date)
    }

    /// Deletes the event and every celebration it owns.
    ///
    /// Fails with `NotFound` when the event does not exist; the
    /// celebration-id lookup doubles as the existence check.
    pub fn delete_event_by_id(&self, id: EventId) -> RepoResult<()> {
        let celebration_ids = self.events.find_celebration_ids_by_event_id(id)?;
        self.celebrations.delete_all_by_ids(&celebration_ids)?;
        self.events.delete_by_id(id)?;
        info!(
            "event=event_deleted module=service id={id} cascaded={}",
            celebration_ids.len()
        );
        Ok(())
    }

    /// Overwrites name, description and date; `celebration_ids` is left
    /// untouched.
    pub fn edit_event(
        &self,
        id: EventId,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> RepoResult<()> {
        let mut event = self.events.find_by_id(id)?;
        event.name = name.into();
        event.description = description.into();
        event.date = date;
        self.events.save(&mut event)?;
        Ok(())
    }
}
