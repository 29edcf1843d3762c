use memodate_core::db::open_db_in_memory;
use memodate_core::{
    parse_date, CelebrationRepository, Event, EventRepository, MemoryCelebrationRepository,
    MemoryEventRepository, MemoryStore, RepoError, SqliteCelebrationRepository,
    SqliteEventRepository,
};
use std::sync::Arc;

fn sample_event(date: &str) -> Event {
    Event::new("Conference", "Annual tech conference", parse_date(date).unwrap())
}

fn check_save_assigns_id_and_round_trips(repo: &impl EventRepository) {
    let mut event = sample_event("05.10.2025");
    assert_eq!(event.id, None);

    let id = repo.save(&mut event).unwrap();
    assert_eq!(event.id, Some(id));

    let loaded = repo.find_by_id(id).unwrap();
    assert_eq!(loaded, event);
    assert!(loaded.celebration_ids.is_empty());
}

#[test]
fn save_assigns_id_and_round_trips_memory() {
    let store = MemoryStore::shared();
    check_save_assigns_id_and_round_trips(&MemoryEventRepository::new(store));
}

#[test]
fn save_assigns_id_and_round_trips_sqlite() {
    let conn = open_db_in_memory().unwrap();
    check_save_assigns_id_and_round_trips(&SqliteEventRepository::try_new(&conn).unwrap());
}

fn check_resave_with_same_id_overwrites(repo: &impl EventRepository) {
    let mut event = sample_event("05.10.2025");
    let id = repo.save(&mut event).unwrap();

    event.name = "Anniversary".to_string();
    event.description = "Renamed".to_string();
    event.date = parse_date("01.01.2026").unwrap();
    assert_eq!(repo.save(&mut event).unwrap(), id);

    let loaded = repo.find_by_id(id).unwrap();
    assert_eq!(loaded.name, "Anniversary");
    assert_eq!(loaded.description, "Renamed");
    assert_eq!(loaded.date, parse_date("01.01.2026").unwrap());
    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn resave_with_same_id_overwrites_memory() {
    let store = MemoryStore::shared();
    check_resave_with_same_id_overwrites(&MemoryEventRepository::new(store));
}

#[test]
fn resave_with_same_id_overwrites_sqlite() {
    let conn = open_db_in_memory().unwrap();
    check_resave_with_same_id_overwrites(&SqliteEventRepository::try_new(&conn).unwrap());
}

fn check_missing_ids_fail_with_not_found(repo: &impl EventRepository) {
    let find_err = repo.find_by_id(9999).unwrap_err();
    assert!(matches!(find_err, RepoError::NotFound { id: 9999, .. }));
    assert!(find_err.to_string().contains("9999"));

    let delete_err = repo.delete_by_id(9999).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound { id: 9999, .. }));
}

#[test]
fn missing_ids_fail_with_not_found_memory() {
    let store = MemoryStore::shared();
    check_missing_ids_fail_with_not_found(&MemoryEventRepository::new(store));
}

#[test]
fn missing_ids_fail_with_not_found_sqlite() {
    let conn = open_db_in_memory().unwrap();
    check_missing_ids_fail_with_not_found(&SqliteEventRepository::try_new(&conn).unwrap());
}

fn check_find_by_date_matches_exact_day_only(repo: &impl EventRepository) {
    let mut first = sample_event("05.10.2025");
    let mut second = Event::new("Marathon", "City marathon", parse_date("05.10.2025").unwrap());
    let mut other = Event::new("Premiere", "Film premiere", parse_date("06.10.2025").unwrap());
    let first_id = repo.save(&mut first).unwrap();
    let second_id = repo.save(&mut second).unwrap();
    repo.save(&mut other).unwrap();

    let found = repo.find_by_date(parse_date("05.10.2025").unwrap()).unwrap();
    let found_ids: Vec<_> = found.iter().map(|event| event.id).collect();
    assert_eq!(found_ids, vec![Some(first_id), Some(second_id)]);

    assert!(repo
        .find_by_date(parse_date("07.10.2025").unwrap())
        .unwrap()
        .is_empty());
}

#[test]
fn find_by_date_matches_exact_day_only_memory() {
    let store = MemoryStore::shared();
    check_find_by_date_matches_exact_day_only(&MemoryEventRepository::new(store));
}

#[test]
fn find_by_date_matches_exact_day_only_sqlite() {
    let conn = open_db_in_memory().unwrap();
    check_find_by_date_matches_exact_day_only(&SqliteEventRepository::try_new(&conn).unwrap());
}

fn check_celebration_ids_lookup_requires_existing_event(repo: &impl EventRepository) {
    let err = repo.find_celebration_ids_by_event_id(12).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 12, .. }));

    let mut event = sample_event("05.10.2025");
    let id = repo.save(&mut event).unwrap();
    assert!(repo.find_celebration_ids_by_event_id(id).unwrap().is_empty());
}

#[test]
fn celebration_ids_lookup_requires_existing_event_memory() {
    let store = MemoryStore::shared();
    check_celebration_ids_lookup_requires_existing_event(&MemoryEventRepository::new(store));
}

#[test]
fn celebration_ids_lookup_requires_existing_event_sqlite() {
    let conn = open_db_in_memory().unwrap();
    check_celebration_ids_lookup_requires_existing_event(
        &SqliteEventRepository::try_new(&conn).unwrap(),
    );
}

fn check_delete_all_clears_events_and_celebrations(
    events: &impl EventRepository,
    celebrations: &impl CelebrationRepository,
) {
    let mut event = sample_event("05.10.2025");
    let event_id = events.save(&mut event).unwrap();
    let mut celebration = memodate_core::Celebration::new(
        event_id,
        "Breakfast Meetup",
        "Morning networking breakfast",
        parse_date("05.10.2025").unwrap(),
        "Lobby",
    );
    let celebration_id = celebrations.save(&mut celebration).unwrap();

    events.delete_all().unwrap();

    assert!(events.find_all().unwrap().is_empty());
    assert!(matches!(
        celebrations.find_by_id(celebration_id).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn delete_all_clears_events_and_celebrations_memory() {
    let store = MemoryStore::shared();
    check_delete_all_clears_events_and_celebrations(
        &MemoryEventRepository::new(Arc::clone(&store)),
        &MemoryCelebrationRepository::new(store),
    );
}

#[test]
fn delete_all_clears_events_and_celebrations_sqlite() {
    let conn = open_db_in_memory().unwrap();
    check_delete_all_clears_events_and_celebrations(
        &SqliteEventRepository::try_new(&conn).unwrap(),
        &SqliteCelebrationRepository::try_new(&conn).unwrap(),
    );
}
