use std::fs;
use std::sync::Barrier;
use std::thread;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::{TempDir, tempdir};

use attendease::api::attendance::{check_in_at, check_out_at, list_attendance};
use attendease::api::records::delete_record;
use attendease::auth::handlers::{authenticate, register};
use attendease::db::init_db;
use attendease::error::ServiceError;
use attendease::model::Role;
use attendease::models::AttendanceScope;
use attendease::state::AppState;
use attendease::store::Store;

/// A session over a freshly seeded file, plus a separate handle on the same
/// file for inspecting what was persisted.
fn seeded() -> (AppState, Store, TempDir) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("attendance_data.json");
    let state = AppState::new(init_db(&path).unwrap());
    (state, Store::open(&path).unwrap(), dir)
}

fn jan(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .unwrap()
}

#[test]
fn employee_day_then_admin_delete() {
    let (state, _store, _dir) = seeded();

    register(&state, "alice", "pw1").unwrap();
    let alice = authenticate(&state, "alice", "pw1").unwrap();
    assert_eq!(alice.role, Role::Employee);

    check_in_at(&state, "alice", jan(1, 9)).unwrap();
    assert!(matches!(
        check_in_at(&state, "alice", jan(1, 10)),
        Err(ServiceError::AlreadyCheckedIn(_))
    ));
    check_out_at(&state, "alice", jan(1, 17)).unwrap();

    let mine = list_attendance(&state, &alice, AttendanceScope::User("alice".into())).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].date, "2024-01-01");
    assert!(!mine[0].check_in.is_empty());
    assert!(!mine[0].check_out.is_empty());

    let admin = authenticate(&state, "admin", "admin123").unwrap();
    assert_eq!(delete_record(&state, &admin, "alice", "2024-01-01").unwrap(), 1);

    let all = list_attendance(&state, &admin, AttendanceScope::All).unwrap();
    assert!(!all.iter().any(|e| e.matches("alice", "2024-01-01")));
}

#[test]
fn concurrent_check_ins_persist_one_entry() {
    const CALLERS: usize = 16;

    let (_state, store, _dir) = seeded();
    let path = store.path().to_path_buf();
    let barrier = Barrier::new(CALLERS);

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                // each caller gets its own handle on the same file
                let caller = AppState::new(Store::open(&path).unwrap());
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    check_in_at(&caller, "alice", jan(2, 9))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let ok = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(ServiceError::AlreadyCheckedIn(_))))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(rejected, CALLERS - 1);

    let stored = store.load().unwrap().attendance;
    assert_eq!(stored.iter().filter(|e| e.matches("alice", "2024-01-02")).count(), 1);
}

#[test]
fn concurrent_registrations_are_not_lost() {
    let (state, store, _dir) = seeded();

    thread::scope(|scope| {
        for i in 0..8 {
            let state = &state;
            scope.spawn(move || register(state, &format!("user{i}"), "pw").unwrap());
        }
    });

    let users = store.load().unwrap().users;
    assert_eq!(users.len(), 9);
    for i in 0..8 {
        assert!(authenticate(&state, &format!("user{i}"), "pw").is_ok());
    }
}

#[test]
fn save_of_load_is_byte_stable() {
    let (state, store, _dir) = seeded();
    register(&state, "alice", "pw1").unwrap();
    check_in_at(&state, "alice", jan(1, 9)).unwrap();

    let before = fs::read(state.data_file()).unwrap();
    let loaded = store.load().unwrap();
    store.save(&loaded).unwrap();

    assert_eq!(fs::read(state.data_file()).unwrap(), before);
}

#[test]
fn ascii_escaped_file_resaves_as_equal_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("attendance_data.json");
    fs::write(
        &path,
        r#"{
    "users": [
        {
            "username": "admin",
            "password": "admin123",
            "role": "admin"
        },
        {
            "username": "j\u00f6rg",
            "password": "pw",
            "role": "employee"
        }
    ],
    "attendance": [
        {
            "username": "j\u00f6rg",
            "date": "2024-01-01",
            "check_in": "09:00:00",
            "check_out": ""
        }
    ]
}"#,
    )
    .unwrap();

    let state = AppState::new(init_db(&path).unwrap());
    let jorg = authenticate(&state, "jörg", "pw").unwrap();
    assert_eq!(jorg.username, "jörg");

    let store = Store::open(&path).unwrap();
    let loaded = store.load().unwrap();
    store.save(&loaded).unwrap();

    // escapes become raw UTF-8; the state itself is unchanged
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"jörg\""));
    assert!(!text.contains("\\u00f6"));
    assert_eq!(store.load().unwrap(), loaded);

    // from here on the file round-trips byte for byte
    let before = fs::read(&path).unwrap();
    store.save(&store.load().unwrap()).unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn file_written_by_earlier_version_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("attendance_data.json");
    fs::write(
        &path,
        r#"{
    "users": [
        {"username": "admin", "password": "admin123", "role": "admin"},
        {"username": "bob", "password": "b", "role": "employee"}
    ],
    "attendance": [
        {"username": "bob", "date": "2023-12-31"}
    ]
}"#,
    )
    .unwrap();

    let state = AppState::new(init_db(&path).unwrap());
    let bob = authenticate(&state, "bob", "b").unwrap();
    let rows = list_attendance(&state, &bob, AttendanceScope::User("bob".into())).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].check_in, "");

    assert!(matches!(
        check_in_at(
            &state,
            "bob",
            NaiveDate::from_ymd_opt(2023, 12, 31)
                .and_then(|d| d.and_hms_opt(9, 0, 0))
                .unwrap()
        ),
        Err(ServiceError::AlreadyCheckedIn(_))
    ));
}

#[test]
fn store_without_admin_is_reported() {
    let (state, _store, _dir) = seeded();
    fs::write(state.data_file(), r#"{"users": [], "attendance": []}"#).unwrap();

    assert!(matches!(
        authenticate(&state, "admin", "admin123"),
        Err(ServiceError::StoreUnavailable(_))
    ));
    assert!(matches!(
        register(&state, "carol", "pw"),
        Err(ServiceError::StoreUnavailable(_))
    ));
}
