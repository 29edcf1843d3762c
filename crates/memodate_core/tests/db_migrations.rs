use memodate_core::db::migrations::latest_version;
use memodate_core::db::{open_db, open_db_in_memory};
use memodate_core::{
    parse_date, CelebrationRepository, Event, EventRepository, RepoError,
    SqliteCelebrationRepository, SqliteEventRepository,
};
use rusqlite::Connection;

#[test]
fn fresh_database_reaches_latest_version() {
    let conn = open_db_in_memory().unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
    assert!(latest_version() > 0);
}

#[test]
fn reopening_a_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memodate.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteEventRepository::try_new(&conn).unwrap();
        let mut event = Event::new("Conference", "Annual", parse_date("05.10.2025").unwrap());
        repo.save(&mut event).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    let repo = SqliteEventRepository::try_new(&conn).unwrap();
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn sequences_reseed_from_max_persisted_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memodate.db");

    {
        let conn = open_db(&path).unwrap();
        let events = SqliteEventRepository::try_new(&conn).unwrap();
        let mut first = Event::new("First", "one", parse_date("01.01.2024").unwrap());
        let mut second = Event::new("Second", "two", parse_date("02.01.2024").unwrap());
        assert_eq!(events.save(&mut first).unwrap(), 1);
        assert_eq!(events.save(&mut second).unwrap(), 2);
    }

    let conn = open_db(&path).unwrap();
    let events = SqliteEventRepository::try_new(&conn).unwrap();
    let mut third = Event::new("Third", "three", parse_date("03.01.2024").unwrap());
    assert_eq!(events.save(&mut third).unwrap(), 3);
}

#[test]
fn repositories_reject_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteEventRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }

    assert!(matches!(
        SqliteCelebrationRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
}

#[test]
fn repositories_reject_connection_missing_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteEventRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("events"))
    ));
    assert!(matches!(
        SqliteCelebrationRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("celebrations"))
    ));
}

#[test]
fn celebration_sequence_is_independent_of_events() {
    let conn = open_db_in_memory().unwrap();
    let events = SqliteEventRepository::try_new(&conn).unwrap();
    let celebrations = SqliteCelebrationRepository::try_new(&conn).unwrap();

    let mut event = Event::new("Conference", "Annual", parse_date("05.10.2025").unwrap());
    let event_id = events.save(&mut event).unwrap();

    let mut celebration = memodate_core::Celebration::new(
        event_id,
        "Breakfast Meetup",
        "Morning",
        parse_date("05.10.2025").unwrap(),
        "Lobby",
    );
    // Celebrations count from their own sequence, not the event one.
    assert_eq!(celebrations.save(&mut celebration).unwrap(), 1);
}
