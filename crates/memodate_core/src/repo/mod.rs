//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one storage contract per entity, satisfied by both the
//!   SQLite and the in-memory backend.
//! - Keep SQL and map-bookkeeping details out of the service layer.
//!
//! # Invariants
//! - Lookups by absent id return `RepoError::NotFound`, never a panic or
//!   a degraded empty result.
//! - Storage failures propagate as `RepoError::Storage`; they are not
//!   logged-and-swallowed.
//! - The event<->celebration linkage lives in an explicit link relation
//!   keyed by celebration id, in both backends.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod celebration_repo;
pub mod event_repo;
pub mod memory;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity kind named in repository errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Event,
    Celebration,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Celebration => write!(f, "celebration"),
        }
    }
}

/// Error for repository persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// No record with the given id exists.
    NotFound { entity: EntityKind, id: i64 },
    /// Underlying storage failure.
    Storage(DbError),
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing from the connection schema.
    MissingRequiredTable(&'static str),
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Verifies the connection carries the migrated schema the repositories
/// expect. Called by every SQLite repository constructor.
pub(crate) fn ensure_schema_ready(
    conn: &rusqlite::Connection,
    required_tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = crate::db::migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in required_tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
