mod common;

use std::fs;
use std::sync::Arc;

use cosmolog::models::{Workout, WorkoutSession, WorkoutType};
use cosmolog::store::{
    BackendKind, BackendPreference, Collection, FlatBackend, IndexField, RecordStore,
    StoreOptions,
};

#[tokio::test]
async fn test_in_memory_store_uses_sqlite() {
    let store = common::setup_test_store().await;

    assert_eq!(store.backend_kind(), Some(BackendKind::Sqlite));
}

#[tokio::test]
async fn test_backend_is_unset_before_init() {
    let store = RecordStore::new(StoreOptions::in_memory());

    assert_eq!(store.backend_kind(), None);
    assert_eq!(store.init().await, BackendKind::Sqlite);
    assert_eq!(store.init().await, BackendKind::Sqlite);
}

#[tokio::test]
async fn test_operations_initialize_lazily() {
    let store = RecordStore::new(StoreOptions::in_memory());
    let session = common::create_test_session("lazy", common::fixed_now(), vec![]);

    assert!(store.save_item(Collection::WorkoutSessions, &session).await);
    assert_eq!(store.backend_kind(), Some(BackendKind::Sqlite));
}

#[tokio::test]
async fn test_session_round_trip_is_identical() {
    let store = common::setup_test_store().await;
    let mut session = common::create_test_session(
        "s1",
        common::fixed_now(),
        vec![
            common::create_test_exercise("Bench Press", &[(10, 60.0), (8, 62.5)]),
            common::create_test_exercise(
                "Row",
                &[
                    (10, 100.47215172171107),
                    (8, 231.40097516489666),
                    (12, 98.78108702314461),
                    (6, 0.1 + 0.2),
                ],
            ),
            common::create_test_exercise("Pull Up", &[(12, 0.0)]),
        ],
    );
    session.session_notes = Some("felt strong".to_string());

    assert!(store.save_item(Collection::WorkoutSessions, &session).await);

    let loaded: WorkoutSession = store
        .get_item(Collection::WorkoutSessions, "s1")
        .await
        .unwrap();
    assert_eq!(loaded, session);
    let weights = |s: &WorkoutSession| -> Vec<u64> {
        s.exercises
            .iter()
            .flat_map(|e| e.completed_sets.iter().map(|set| set.weight.to_bits()))
            .collect()
    };
    assert_eq!(weights(&loaded), weights(&session));
    assert_eq!(
        serde_json::to_string(&loaded).unwrap(),
        serde_json::to_string(&session).unwrap()
    );
}

#[tokio::test]
async fn test_get_item_missing_returns_none() {
    let store = common::setup_test_store().await;

    let loaded: Option<WorkoutSession> = store
        .get_item(Collection::WorkoutSessions, "nope")
        .await;
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_save_overwrites_same_id() {
    let store = common::setup_test_store().await;
    let mut session = common::create_test_session("s1", common::fixed_now(), vec![]);
    store.save_item(Collection::WorkoutSessions, &session).await;

    session.workout_name = "Lower Body".to_string();
    store.save_item(Collection::WorkoutSessions, &session).await;

    let all: Vec<WorkoutSession> = store.get_all_items(Collection::WorkoutSessions).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].workout_name, "Lower Body");
}

#[tokio::test]
async fn test_delete_and_clear() {
    let store = common::setup_test_store().await;
    for id in ["a", "b", "c"] {
        let session = common::create_test_session(id, common::fixed_now(), vec![]);
        store.save_item(Collection::WorkoutSessions, &session).await;
    }

    assert!(store.delete_item(Collection::WorkoutSessions, "b").await);
    // Deleting an unknown id is not an error.
    assert!(store.delete_item(Collection::WorkoutSessions, "b").await);

    let remaining: Vec<WorkoutSession> = store.get_all_items(Collection::WorkoutSessions).await;
    assert_eq!(remaining.len(), 2);

    assert!(store.clear_store(Collection::WorkoutSessions).await);
    let remaining: Vec<WorkoutSession> = store.get_all_items(Collection::WorkoutSessions).await;
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_clear_leaves_other_collections() {
    let store = common::setup_test_store().await;
    let session = common::create_test_session("s1", common::fixed_now(), vec![]);
    let workout = Workout {
        id: "custom-1".to_string(),
        day: 1,
        name: "Mine".to_string(),
        workout_type: WorkoutType::Home,
        exercises: vec![],
        is_custom: true,
        created_at: None,
    };
    store.save_item(Collection::WorkoutSessions, &session).await;
    store.save_item(Collection::CustomWorkouts, &workout).await;

    store.clear_store(Collection::WorkoutSessions).await;

    let workouts: Vec<Workout> = store.get_all_items(Collection::CustomWorkouts).await;
    assert_eq!(workouts, vec![workout]);
}

async fn assert_find_by_index(store: RecordStore) {
    let now = common::fixed_now();
    let mut home = common::create_test_session("home", now, vec![]);
    home.workout_type = WorkoutType::Home;
    let gym = common::create_test_session("gym", common::days_before(now, 1), vec![]);
    store.save_item(Collection::WorkoutSessions, &home).await;
    store.save_item(Collection::WorkoutSessions, &gym).await;

    let found: Vec<WorkoutSession> = store
        .find_by_index(Collection::WorkoutSessions, IndexField::WorkoutType, "home")
        .await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "home");

    let date = serde_json::to_value(&gym).unwrap()["date"]
        .as_str()
        .unwrap()
        .to_string();
    let found: Vec<WorkoutSession> = store
        .find_by_index(Collection::WorkoutSessions, IndexField::Date, &date)
        .await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "gym");

    let found: Vec<WorkoutSession> = store
        .find_by_index(Collection::WorkoutSessions, IndexField::WorkoutType, "bag")
        .await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_find_by_index_sqlite() {
    assert_find_by_index(common::setup_test_store().await).await;
}

#[tokio::test]
async fn test_find_by_index_flat() {
    assert_find_by_index(common::setup_flat_store().await).await;
}

#[tokio::test]
async fn test_sqlite_file_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("store.db").display());
    let options = StoreOptions {
        preference: BackendPreference::Auto,
        database_url: url,
        fallback_path: None,
        fallback_quota_bytes: None,
    };

    let session = common::create_test_session("persisted", common::fixed_now(), vec![]);
    {
        let store = RecordStore::new(options.clone());
        assert_eq!(store.init().await, BackendKind::Sqlite);
        assert!(store.save_item(Collection::WorkoutSessions, &session).await);
    }

    let reopened = RecordStore::new(options);
    let loaded: Option<WorkoutSession> = reopened
        .get_item(Collection::WorkoutSessions, "persisted")
        .await;
    assert_eq!(loaded, Some(session));
}

#[tokio::test]
async fn test_falls_back_when_database_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("garbage.db");
    fs::write(&db_path, b"this is definitely not a sqlite database file").unwrap();

    let store = RecordStore::new(StoreOptions {
        preference: BackendPreference::Auto,
        database_url: format!("sqlite:{}", db_path.display()),
        fallback_path: Some(dir.path().join("fallback.json")),
        fallback_quota_bytes: None,
    });

    assert_eq!(store.init().await, BackendKind::Flat);

    let session = common::create_test_session("s1", common::fixed_now(), vec![]);
    assert!(store.save_item(Collection::WorkoutSessions, &session).await);
    let loaded: Option<WorkoutSession> = store.get_item(Collection::WorkoutSessions, "s1").await;
    assert_eq!(loaded, Some(session));
}

#[tokio::test]
async fn test_falls_back_when_directory_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite:{}",
        dir.path().join("missing").join("store.db").display()
    );

    let store = RecordStore::new(StoreOptions {
        preference: BackendPreference::Auto,
        database_url: url,
        fallback_path: None,
        fallback_quota_bytes: None,
    });

    assert_eq!(store.init().await, BackendKind::Flat);
}

#[tokio::test]
async fn test_flat_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let session = common::create_test_session("s1", common::fixed_now(), vec![]);

    {
        let store = RecordStore::new(StoreOptions::flat(Some(path.clone())));
        assert_eq!(store.init().await, BackendKind::Flat);
        assert!(store.save_item(Collection::WorkoutSessions, &session).await);
    }

    assert!(path.exists());
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("workout-sessions-s1"));

    let reopened = RecordStore::new(StoreOptions::flat(Some(path)));
    let all: Vec<WorkoutSession> = reopened.get_all_items(Collection::WorkoutSessions).await;
    assert_eq!(all, vec![session]);
}

#[tokio::test]
async fn test_corrupt_flat_file_is_replaced_and_writes_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    fs::write(&path, "{not json").unwrap();
    let session = common::create_test_session("s1", common::fixed_now(), vec![]);

    {
        let store = RecordStore::new(StoreOptions::flat(Some(path.clone())));
        assert_eq!(store.init().await, BackendKind::Flat);
        assert!(store.save_item(Collection::WorkoutSessions, &session).await);
    }

    assert!(dir.path().join("records.json.corrupt").exists());

    let reopened = RecordStore::new(StoreOptions::flat(Some(path)));
    let all: Vec<WorkoutSession> = reopened.get_all_items(Collection::WorkoutSessions).await;
    assert_eq!(all, vec![session]);
}

#[tokio::test]
async fn test_unloadable_flat_store_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be read as the store file.
    let store = RecordStore::new(StoreOptions::flat(Some(dir.path().to_path_buf())));
    let session = common::create_test_session("s1", common::fixed_now(), vec![]);

    assert!(!store.save_item(Collection::WorkoutSessions, &session).await);
    assert!(!store.clear_store(Collection::WorkoutSessions).await);
    let loaded: Option<WorkoutSession> = store.get_item(Collection::WorkoutSessions, "s1").await;
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_quota_exceeded_reports_false() {
    let store = RecordStore::with_backend(Arc::new(FlatBackend::in_memory(Some(256))));
    let big = common::create_test_session(
        "big",
        common::fixed_now(),
        vec![common::create_test_exercise("Squat", &[(5, 100.0); 20])],
    );

    assert!(!store.save_item(Collection::WorkoutSessions, &big).await);

    let all: Vec<WorkoutSession> = store.get_all_items(Collection::WorkoutSessions).await;
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_undecodable_records_are_skipped() {
    let store = common::setup_test_store().await;
    let session = common::create_test_session("good", common::fixed_now(), vec![]);
    let workout = Workout {
        id: "bad".to_string(),
        day: 1,
        name: "Wrong collection".to_string(),
        workout_type: WorkoutType::Bag,
        exercises: vec![],
        is_custom: true,
        created_at: None,
    };
    store.save_item(Collection::WorkoutSessions, &session).await;
    // A workout template is not a valid session.
    store.save_item(Collection::WorkoutSessions, &workout).await;

    let all: Vec<WorkoutSession> = store.get_all_items(Collection::WorkoutSessions).await;
    assert_eq!(all, vec![session]);
}
