//! Map-backed in-memory repositories.
//!
//! # Responsibility
//! - Satisfy both repository contracts without a database.
//! - Keep cascade and linkage behavior observably identical to the
//!   SQLite backend.
//!
//! # Invariants
//! - Both repositories share one `MemoryStore`; the link relation is the
//!   only source of truth for the event<->celebration association.
//! - Sequences start at 1 and are owned by the store.

use crate::model::celebration::{Celebration, CelebrationId};
use crate::model::event::{Event, EventId};
use crate::repo::celebration_repo::CelebrationRepository;
use crate::repo::event_repo::EventRepository;
use crate::repo::{EntityKind, RepoError, RepoResult};
use crate::sequence::Sequence;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct EventRow {
    name: String,
    description: String,
    date: NaiveDate,
}

#[derive(Debug, Clone)]
struct CelebrationRow {
    name: String,
    description: String,
    date: NaiveDate,
    place: String,
}

/// Shared state behind both in-memory repositories.
///
/// `BTreeMap` keeps `find_all` id-ordered and deterministic. The store is
/// guarded by a mutex so a future concurrent facade does not inherit data
/// races; the CLI itself is single-threaded.
#[derive(Debug)]
pub struct MemoryStore {
    events: BTreeMap<EventId, EventRow>,
    celebrations: BTreeMap<CelebrationId, CelebrationRow>,
    links: BTreeMap<CelebrationId, EventId>,
    event_sequence: Sequence,
    celebration_sequence: Sequence,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            events: BTreeMap::new(),
            celebrations: BTreeMap::new(),
            links: BTreeMap::new(),
            event_sequence: Sequence::new(),
            celebration_sequence: Sequence::new(),
        }
    }

    /// Creates a store handle shareable between both repositories.
    pub fn shared() -> Arc<Mutex<MemoryStore>> {
        Arc::new(Mutex::new(Self::new()))
    }

    fn celebration_ids_of(&self, event_id: EventId) -> BTreeSet<CelebrationId> {
        self.links
            .iter()
            .filter(|(_, owner)| **owner == event_id)
            .map(|(celebration_id, _)| *celebration_id)
            .collect()
    }

    fn event_entity(&self, id: EventId) -> Option<Event> {
        self.events.get(&id).map(|row| {
            Event::with_id(
                id,
                row.name.clone(),
                row.description.clone(),
                row.date,
                self.celebration_ids_of(id),
            )
        })
    }

    fn celebration_entity(&self, id: CelebrationId) -> RepoResult<Option<Celebration>> {
        let Some(row) = self.celebrations.get(&id) else {
            return Ok(None);
        };
        let Some(event_id) = self.links.get(&id) else {
            return Err(RepoError::InvalidData(format!(
                "celebration {id} has no event link"
            )));
        };
        Ok(Some(Celebration::with_id(
            id,
            *event_id,
            row.name.clone(),
            row.description.clone(),
            row.date,
            row.place.clone(),
        )))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_store(store: &Mutex<MemoryStore>) -> MutexGuard<'_, MemoryStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory event repository over a shared store.
#[derive(Clone)]
pub struct MemoryEventRepository {
    store: Arc<Mutex<MemoryStore>>,
}

impl MemoryEventRepository {
    pub fn new(store: Arc<Mutex<MemoryStore>>) -> Self {
        Self { store }
    }
}

impl EventRepository for MemoryEventRepository {
    fn find_by_id(&self, id: EventId) -> RepoResult<Event> {
        let store = lock_store(&self.store);
        store
            .event_entity(id)
            .ok_or_else(|| RepoError::not_found(EntityKind::Event, id))
    }

    fn find_all(&self) -> RepoResult<Vec<Event>> {
        let store = lock_store(&self.store);
        let ids: Vec<EventId> = store.events.keys().copied().collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| store.event_entity(id))
            .collect())
    }

    fn save(&self, event: &mut Event) -> RepoResult<EventId> {
        let mut store = lock_store(&self.store);
        let id = match event.id {
            Some(id) => id,
            None => {
                let id = store.event_sequence.next();
                event.id = Some(id);
                id
            }
        };

        store.events.insert(
            id,
            EventRow {
                name: event.name.clone(),
                description: event.description.clone(),
                date: event.date,
            },
        );

        // Replace this event's links from the entity's id set, keeping
        // parity with the SQLite delete-then-insert.
        store.links.retain(|_, owner| *owner != id);
        for celebration_id in &event.celebration_ids {
            store.links.insert(*celebration_id, id);
        }

        Ok(id)
    }

    fn delete_by_id(&self, id: EventId) -> RepoResult<()> {
        let mut store = lock_store(&self.store);
        if !store.events.contains_key(&id) {
            return Err(RepoError::not_found(EntityKind::Event, id));
        }

        let celebration_ids = store.celebration_ids_of(id);
        for celebration_id in &celebration_ids {
            store.celebrations.remove(celebration_id);
            store.links.remove(celebration_id);
        }
        store.events.remove(&id);
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        let mut store = lock_store(&self.store);
        store.events.clear();
        store.celebrations.clear();
        store.links.clear();
        Ok(())
    }

    fn find_by_date(&self, date: NaiveDate) -> RepoResult<Vec<Event>> {
        let store = lock_store(&self.store);
        let ids: Vec<EventId> = store
            .events
            .iter()
            .filter(|(_, row)| row.date == date)
            .map(|(id, _)| *id)
            .collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| store.event_entity(id))
            .collect())
    }

    fn find_celebration_ids_by_event_id(
        &self,
        event_id: EventId,
    ) -> RepoResult<BTreeSet<CelebrationId>> {
        let store = lock_store(&self.store);
        if !store.events.contains_key(&event_id) {
            return Err(RepoError::not_found(EntityKind::Event, event_id));
        }
        Ok(store.celebration_ids_of(event_id))
    }
}

/// In-memory celebration repository over a shared store.
#[derive(Clone)]
pub struct MemoryCelebrationRepository {
    store: Arc<Mutex<MemoryStore>>,
}

impl MemoryCelebrationRepository {
    pub fn new(store: Arc<Mutex<MemoryStore>>) -> Self {
        Self { store }
    }
}

impl CelebrationRepository for MemoryCelebrationRepository {
    fn find_by_id(&self, id: CelebrationId) -> RepoResult<Celebration> {
        let store = lock_store(&self.store);
        store
            .celebration_entity(id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Celebration, id))
    }

    fn find_all(&self) -> RepoResult<Vec<Celebration>> {
        let store = lock_store(&self.store);
        let ids: Vec<CelebrationId> = store.celebrations.keys().copied().collect();
        let mut celebrations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(celebration) = store.celebration_entity(id)? {
                celebrations.push(celebration);
            }
        }
        Ok(celebrations)
    }

    fn save(&self, celebration: &mut Celebration) -> RepoResult<CelebrationId> {
        let mut store = lock_store(&self.store);
        let id = match celebration.id {
            Some(id) => id,
            None => {
                let id = store.celebration_sequence.next();
                celebration.id = Some(id);
                id
            }
        };

        store.celebrations.insert(
            id,
            CelebrationRow {
                name: celebration.name.clone(),
                description: celebration.description.clone(),
                date: celebration.date,
                place: celebration.place.clone(),
            },
        );
        store.links.insert(id, celebration.event_id);
        Ok(id)
    }

    fn delete_by_id(&self, id: CelebrationId) -> RepoResult<()> {
        let mut store = lock_store(&self.store);
        if store.celebrations.remove(&id).is_none() {
            return Err(RepoError::not_found(EntityKind::Celebration, id));
        }
        store.links.remove(&id);
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        let mut store = lock_store(&self.store);
        store.celebrations.clear();
        store.links.clear();
        Ok(())
    }

    fn find_all_by_ids(&self, ids: &BTreeSet<CelebrationId>) -> RepoResult<Vec<Celebration>> {
        let store = lock_store(&self.store);
        let mut celebrations = Vec::new();
        for id in ids {
            if let Some(celebration) = store.celebration_entity(*id)? {
                celebrations.push(celebration);
            }
        }
        Ok(celebrations)
    }

    fn delete_all_by_ids(&self, ids: &BTreeSet<CelebrationId>) -> RepoResult<()> {
        let mut store = lock_store(&self.store);
        for id in ids {
            store.celebrations.remove(id);
            store.links.remove(id);
        }
        Ok(())
    }
}
