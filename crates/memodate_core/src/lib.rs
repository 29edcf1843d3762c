//! Core domain logic for the memorable-dates record keeper.
//! This crate is the single source of truth for entity invariants and the
//! event/celebration linkage bookkeeping.

pub mod config;
pub mod dates;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sequence;
pub mod service;

pub use config::{Config, ConfigError, StorageMode};
pub use dates::{format_date, parse_date, DateParseError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::celebration::{Celebration, CelebrationId};
pub use model::event::{Event, EventId};
pub use repo::celebration_repo::{CelebrationRepository, SqliteCelebrationRepository};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::memory::{MemoryCelebrationRepository, MemoryEventRepository, MemoryStore};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use sequence::Sequence;
pub use service::celebration_service::CelebrationService;
pub use service::event_service::EventService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
