//! Celebration domain model.

use crate::model::event::EventId;
use chrono::NaiveDate;

/// Stable identifier assigned to a celebration on first save.
pub type CelebrationId = i64;

/// One observance of a memorable date.
///
/// `event_id` names the owning event; it is required but only validated
/// at the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Celebration {
    /// Sequence-assigned id. `None` for a not-yet-persisted celebration.
    pub id: Option<CelebrationId>,
    /// Id of the owning event.
    pub event_id: EventId,
    /// Short label.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Date of this occurrence; may differ from the event's date.
    pub date: NaiveDate,
    /// Where the celebration takes place.
    pub place: String,
}

impl Celebration {
    /// Creates a celebration that has not been persisted yet.
    pub fn new(
        event_id: EventId,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        place: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            event_id,
            name: name.into(),
            description: description.into(),
            date,
            place: place.into(),
        }
    }

    /// Creates a celebration with an already-known id.
    pub fn with_id(
        id: CelebrationId,
        event_id: EventId,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        place: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            event_id,
            name: name.into(),
            description: description.into(),
            date,
            place: place.into(),
        }
    }
}
