//! Event domain model.
//!
//! # Responsibility
//! - Represent one memorable date together with the ids of its
//!   celebrations.
//!
//! # Invariants
//! - `id` is `None` until the first repository save and never changes
//!   afterwards.
//! - `celebration_ids` holds each celebration id at most once.

use crate::model::celebration::CelebrationId;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Stable identifier assigned to an event on first save.
pub type EventId = i64;

/// One memorable date with its linked celebration ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Sequence-assigned id. `None` for a not-yet-persisted event.
    pub id: Option<EventId>,
    /// Short label.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Calendar date of the event, no time component.
    pub date: NaiveDate,
    /// Ids of celebrations observing this event. Rebuilt from the link
    /// relation on read; persisted as link rows on save.
    pub celebration_ids: BTreeSet<CelebrationId>,
}

impl Event {
    /// Creates an event that has not been persisted yet.
    pub fn new(name: impl Into<String>, description: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            date,
            celebration_ids: BTreeSet::new(),
        }
    }

    /// Creates an event with an already-known id.
    ///
    /// Used by repository read paths when rebuilding entities from rows.
    pub fn with_id(
        id: EventId,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        celebration_ids: BTreeSet<CelebrationId>,
    ) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            description: description.into(),
            date,
            celebration_ids,
        }
    }
}
