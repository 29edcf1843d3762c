//! Celebration use-case service.
//!
//! # Responsibility
//! - Provide celebration CRUD entry points.
//! - Keep the owning event's `celebration_ids` registration in step with
//!   celebration saves and deletes.

use crate::model::celebration::{Celebration, CelebrationId};
use crate::model::event::EventId;
use crate::repo::celebration_repo::CelebrationRepository;
use crate::repo::event_repo::EventRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::info;

/// Celebration use-case service over injected repository
/// implementations.
pub struct CelebrationService<E: EventRepository, C: CelebrationRepository> {
    events: E,
    celebrations: C,
}

impl<E: EventRepository, C: CelebrationRepository> CelebrationService<E, C> {
    pub fn new(events: E, celebrations: C) -> Self {
        Self {
            events,
            celebrations,
        }
    }

    /// Saves a new celebration against `event_id` and registers it on the
    /// owning event.
    ///
    /// The celebration is persisted before the owning event is resolved:
    /// when `event_id` names no event, this fails with `NotFound` and the
    /// already-saved celebration stays in storage.
    pub fn add_celebration(
        &self,
        event_id: EventId,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        place: impl Into<String>,
    ) -> RepoResult<CelebrationId> {
        let mut celebration = Celebration::new(event_id, name, description, date, place);
        let celebration_id = self.celebrations.save(&mut celebration)?;

        let mut event = self.events.find_by_id(event_id)?;
        event.celebration_ids.insert(celebration_id);
        self.events.save(&mut event)?;

        info!("event=celebration_added module=service id={celebration_id} event_id={event_id}");
        Ok(celebration_id)
    }

    /// Fails with `NotFound` when the celebration does not exist.
    pub fn get_celebration_by_id(&self, id: CelebrationId) -> RepoResult<Celebration> {
        self.celebrations.find_by_id(id)
    }

    /// Unregisters the celebration from its owning event, then deletes
    /// it. Fails with `NotFound` when the celebration does not exist.
    pub fn delete_celebration_by_id(&self, id: CelebrationId) -> RepoResult<()> {
        let celebration = self.celebrations.find_by_id(id)?;
        let mut event = self.events.find_by_id(celebration.event_id)?;
        event.celebration_ids.remove(&id);
        self.events.save(&mut event)?;
        self.celebrations.delete_by_id(id)?;
        info!("event=celebration_deleted module=service id={id}");
        Ok(())
    }

    /// Overwrites name, description, date and place; `event_id` is left
    /// unchanged.
    pub fn edit_celebration(
        &self,
        id: CelebrationId,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        place: impl Into<String>,
    ) -> RepoResult<()> {
        let mut celebration = self.celebrations.find_by_id(id)?;
        celebration.name = name.into();
        celebration.description = description.into();
        celebration.date = date;
        celebration.place = place.into();
        self.celebrations.save(&mut celebration)?;
        Ok(())
    }
}
