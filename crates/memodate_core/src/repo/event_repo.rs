//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and date-query APIs over `events` storage.
//! - Maintain the event side of the `events_celebrations` link relation.
//!
//! # Invariants
//! - `celebration_ids` is rebuilt from the link relation on every read.
//! - Saving an event replaces its link rows from `celebration_ids`
//!   (delete-then-insert).
//! - Deleting an event cascades to its link rows and celebrations.

use crate::dates::{decode_storage_date, encode_storage_date};
use crate::model::celebration::CelebrationId;
use crate::model::event::{Event, EventId};
use crate::repo::{ensure_schema_ready, EntityKind, RepoError, RepoResult};
use crate::sequence::Sequence;
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::sync::Arc;

const EVENT_SELECT_SQL: &str = "SELECT id, name, description, date FROM events";

/// Repository contract for event storage, satisfied by both backends.
pub trait EventRepository {
    /// Fails with `NotFound` when no event with that id exists.
    fn find_by_id(&self, id: EventId) -> RepoResult<Event>;
    /// Returns all events, id-ordered; empty when none exist.
    fn find_all(&self) -> RepoResult<Vec<Event>>;
    /// Assigns an id from the sequence when unset, upserts, and replaces
    /// the event's link rows. Returns the (possibly new) id.
    fn save(&self, event: &mut Event) -> RepoResult<EventId>;
    /// Removes the event, its link rows and its celebrations. Fails with
    /// `NotFound` when the event does not exist.
    fn delete_by_id(&self, id: EventId) -> RepoResult<()>;
    /// Clears events, links and celebrations unconditionally.
    fn delete_all(&self) -> RepoResult<()>;
    /// Returns all events whose date equals the given date exactly.
    fn find_by_date(&self, date: NaiveDate) -> RepoResult<Vec<Event>>;
    /// Returns the event's celebration ids; empty set when it has none.
    /// Fails with `NotFound` when the event does not exist.
    fn find_celebration_ids_by_event_id(
        &self,
        event_id: EventId,
    ) -> RepoResult<BTreeSet<CelebrationId>>;
}

/// SQLite-backed event repository.
#[derive(Clone)]
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
    sequence: Arc<Sequence>,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection and seeds the
    /// id sequence at `max(id) + 1` so new ids never collide with
    /// persisted rows.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &["events", "celebrations", "events_celebrations"])?;
        let max_id: i64 =
            conn.query_row("SELECT COALESCE(MAX(id), 0) FROM events;", [], |row| {
                row.get(0)
            })?;
        Ok(Self {
            conn,
            sequence: Arc::new(Sequence::starting_at(max_id + 1)),
        })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn find_by_id(&self, id: EventId) -> RepoResult<Event> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        let Some(row) = rows.next()? else {
            return Err(RepoError::not_found(EntityKind::Event, id));
        };

        let celebration_ids = load_celebration_ids(self.conn, id)?;
        parse_event_row(row, celebration_ids)
    }

    fn find_all(&self) -> RepoResult<Vec<Event>> {
        self.query_events(&format!("{EVENT_SELECT_SQL} ORDER BY id ASC;"), params![])
    }

    fn save(&self, event: &mut Event) -> RepoResult<EventId> {
        let id = match event.id {
            Some(id) => id,
            None => {
                let id = self.sequence.next();
                event.id = Some(id);
                id
            }
        };

        self.conn.execute(
            "INSERT INTO events (id, name, description, date) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                date = excluded.date;",
            params![
                id,
                event.name.as_str(),
                event.description.as_str(),
                encode_storage_date(event.date),
            ],
        )?;

        self.conn.execute(
            "DELETE FROM events_celebrations WHERE event_id = ?1;",
            params![id],
        )?;
        let mut link_stmt = self.conn.prepare(
            "INSERT INTO events_celebrations (celebration_id, event_id) VALUES (?1, ?2)
             ON CONFLICT (celebration_id) DO UPDATE SET event_id = excluded.event_id;",
        )?;
        for celebration_id in &event.celebration_ids {
            link_stmt.execute(params![celebration_id, id])?;
        }

        Ok(id)
    }

    fn delete_by_id(&self, id: EventId) -> RepoResult<()> {
        let celebration_ids = load_celebration_ids(self.conn, id)?;

        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Event, id));
        }

        self.conn.execute(
            "DELETE FROM events_celebrations WHERE event_id = ?1;",
            params![id],
        )?;
        if !celebration_ids.is_empty() {
            let placeholders = sql_placeholders(celebration_ids.len());
            self.conn.execute(
                &format!("DELETE FROM celebrations WHERE id IN ({placeholders});"),
                params_from_iter(celebration_ids.iter()),
            )?;
        }

        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM events;", [])?;
        self.conn.execute("DELETE FROM events_celebrations;", [])?;
        self.conn.execute("DELETE FROM celebrations;", [])?;
        Ok(())
    }

    fn find_by_date(&self, date: NaiveDate) -> RepoResult<Vec<Event>> {
        self.query_events(
            &format!("{EVENT_SELECT_SQL} WHERE date = ?1 ORDER BY id ASC;"),
            params![encode_storage_date(date)],
        )
    }

    fn find_celebration_ids_by_event_id(
        &self,
        event_id: EventId,
    ) -> RepoResult<BTreeSet<CelebrationId>> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1);",
            params![event_id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::not_found(EntityKind::Event, event_id));
        }

        load_celebration_ids(self.conn, event_id)
    }
}

impl SqliteEventRepository<'_> {
    fn query_events(
        &self,
        sql: &str,
        bind: impl rusqlite::Params,
    ) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            let id: EventId = row.get("id")?;
            let celebration_ids = load_celebration_ids(self.conn, id)?;
            events.push(parse_event_row(row, celebration_ids)?);
        }
        Ok(events)
    }
}

fn parse_event_row(row: &Row<'_>, celebration_ids: BTreeSet<CelebrationId>) -> RepoResult<Event> {
    let id: EventId = row.get("id")?;
    let date_text: String = row.get("date")?;
    let date = decode_storage_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid date value `{date_text}` in events.date"))
    })?;

    Ok(Event::with_id(
        id,
        row.get::<_, String>("name")?,
        row.get::<_, String>("description")?,
        date,
        celebration_ids,
    ))
}

fn load_celebration_ids(
    conn: &Connection,
    event_id: EventId,
) -> RepoResult<BTreeSet<CelebrationId>> {
    let mut stmt = conn.prepare(
        "SELECT celebration_id FROM events_celebrations WHERE event_id = ?1;",
    )?;
    let mut rows = stmt.query(params![event_id])?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        ids.insert(row.get::<_, CelebrationId>(0)?);
    }
    Ok(ids)
}

pub(crate) fn sql_placeholders(count: usize) -> String {
    let mut placeholders = String::new();
    for index in 1..=count {
        if index > 1 {
            placeholders.push_str(", ");
        }
        placeholders.push('?');
        placeholders.push_str(&index.to_string());
    }
    placeholders
}
