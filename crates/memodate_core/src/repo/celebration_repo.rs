//! Celebration repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and bulk-by-id APIs over `celebrations` storage.
//! - Maintain the celebration side of the `events_celebrations` link
//!   relation.
//!
//! # Invariants
//! - Saving a celebration upserts its own link row
//!   (`celebration_id -> event_id`).
//! - `find_all_by_ids` drops missing ids silently; `delete_all_by_ids`
//!   skips missing ids silently.

use crate::dates::{decode_storage_date, encode_storage_date};
use crate::model::celebration::{Celebration, CelebrationId};
use crate::repo::event_repo::sql_placeholders;
use crate::repo::{ensure_schema_ready, EntityKind, RepoError, RepoResult};
use crate::sequence::Sequence;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

const CELEBRATION_SELECT_SQL: &str = "SELECT
    celebrations.id AS id,
    celebrations.name AS name,
    celebrations.description AS description,
    celebrations.date AS date,
    celebrations.place AS place,
    events_celebrations.event_id AS event_id
FROM celebrations
LEFT JOIN events_celebrations ON events_celebrations.celebration_id = celebrations.id";

/// Repository contract for celebration storage, satisfied by both
/// backends.
pub trait CelebrationRepository {
    /// Fails with `NotFound` when no celebration with that id exists.
    fn find_by_id(&self, id: CelebrationId) -> RepoResult<Celebration>;
    /// Returns all celebrations, id-ordered; empty when none exist.
    fn find_all(&self) -> RepoResult<Vec<Celebration>>;
    /// Assigns an id from the sequence when unset, upserts the record and
    /// its link row. Returns the (possibly new) id.
    fn save(&self, celebration: &mut Celebration) -> RepoResult<CelebrationId>;
    /// Removes the celebration and its link row. Fails with `NotFound`
    /// when the celebration does not exist.
    fn delete_by_id(&self, id: CelebrationId) -> RepoResult<()>;
    /// Clears celebrations and their link rows unconditionally.
    fn delete_all(&self) -> RepoResult<()>;
    /// Returns the subset of requested ids that exist.
    fn find_all_by_ids(&self, ids: &BTreeSet<CelebrationId>) -> RepoResult<Vec<Celebration>>;
    /// Removes each id that exists; missing ids are skipped.
    fn delete_all_by_ids(&self, ids: &BTreeSet<CelebrationId>) -> RepoResult<()>;
}

/// SQLite-backed celebration repository.
#[derive(Clone)]
pub struct SqliteCelebrationRepository<'conn> {
    conn: &'conn Connection,
    sequence: Arc<Sequence>,
}

impl<'conn> SqliteCelebrationRepository<'conn> {
    /// Constructs a repository from a migrated connection and seeds the
    /// id sequence at `max(id) + 1`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["celebrations", "events_celebrations"])?;
        let max_id: i64 =
            conn.query_row("SELECT COALESCE(MAX(id), 0) FROM celebrations;", [], |row| {
                row.get(0)
            })?;
        Ok(Self {
            conn,
            sequence: Arc::new(Sequence::starting_at(max_id + 1)),
        })
    }

    fn query_celebrations(
        &self,
        sql: &str,
        bind: impl rusqlite::Params,
    ) -> RepoResult<Vec<Celebration>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut celebrations = Vec::new();
        while let Some(row) = rows.next()? {
            celebrations.push(parse_celebration_row(row)?);
        }
        Ok(celebrations)
    }
}

impl CelebrationRepository for SqliteCelebrationRepository<'_> {
    fn find_by_id(&self, id: CelebrationId) -> RepoResult<Celebration> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CELEBRATION_SELECT_SQL} WHERE celebrations.id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        let Some(row) = rows.next()? else {
            return Err(RepoError::not_found(EntityKind::Celebration, id));
        };
        parse_celebration_row(row)
    }

    fn find_all(&self) -> RepoResult<Vec<Celebration>> {
        self.query_celebrations(
            &format!("{CELEBRATION_SELECT_SQL} ORDER BY celebrations.id ASC;"),
            params![],
        )
    }

    fn save(&self, celebration: &mut Celebration) -> RepoResult<CelebrationId> {
        let id = match celebration.id {
            Some(id) => id,
            None => {
                let id = self.sequence.next();
                celebration.id = Some(id);
                id
            }
        };

        self.conn.execute(
            "INSERT INTO celebrations (id, name, description, date, place)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                date = excluded.date,
                place = excluded.place;",
            params![
                id,
                celebration.name.as_str(),
                celebration.description.as_str(),
                encode_storage_date(celebration.date),
                celebration.place.as_str(),
            ],
        )?;
        self.conn.execute(
            "INSERT INTO events_celebrations (celebration_id, event_id) VALUES (?1, ?2)
             ON CONFLICT (celebration_id) DO UPDATE SET event_id = excluded.event_id;",
            params![id, celebration.event_id],
        )?;

        Ok(id)
    }

    fn delete_by_id(&self, id: CelebrationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM celebrations WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Celebration, id));
        }
        self.conn.execute(
            "DELETE FROM events_celebrations WHERE celebration_id = ?1;",
            params![id],
        )?;
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM events_celebrations;", [])?;
        self.conn.execute("DELETE FROM celebrations;", [])?;
        Ok(())
    }

    fn find_all_by_ids(&self, ids: &BTreeSet<CelebrationId>) -> RepoResult<Vec<Celebration>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = sql_placeholders(ids.len());
        self.query_celebrations(
            &format!(
                "{CELEBRATION_SELECT_SQL}
                 WHERE celebrations.id IN ({placeholders})
                 ORDER BY celebrations.id ASC;"
            ),
            params_from_iter(ids.iter()),
        )
    }

    fn delete_all_by_ids(&self, ids: &BTreeSet<CelebrationId>) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let placeholders = sql_placeholders(ids.len());
        self.conn.execute(
            &format!("DELETE FROM celebrations WHERE id IN ({placeholders});"),
            params_from_iter(ids.iter()),
        )?;
        self.conn.execute(
            &format!("DELETE FROM events_celebrations WHERE celebration_id IN ({placeholders});"),
            params_from_iter(ids.iter()),
        )?;
        Ok(())
    }
}

fn parse_celebration_row(row: &Row<'_>) -> RepoResult<Celebration> {
    let id: CelebrationId = row.get("id")?;
    let date_text: String = row.get("date")?;
    let date = decode_storage_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date value `{date_text}` in celebrations.date"
        ))
    })?;
    let event_id: Option<i64> = row.get("event_id")?;
    let event_id = event_id.ok_or_else(|| {
        RepoError::InvalidData(format!("celebration {id} has no events_celebrations row"))
    })?;

    Ok(Celebration::with_id(
        id,
        event_id,
        row.get::<_, String>("name")?,
        row.get::<_, String>("description")?,
        date,
        row.get::<_, String>("place")?,
    ))
}
