mod common;

use std::sync::Arc;

use chrono::NaiveDate;

use cosmolog::models::{
    NewNutritionLog, NewWeighIn, NutritionTargets, ProfileUpdate, StoredProfile, PROFILE_ID,
};
use cosmolog::repositories::ProfileRepository;
use cosmolog::store::{Collection, FlatBackend, RecordStore};

fn nutrition(day: u32, protein: f64) -> NewNutritionLog {
    NewNutritionLog {
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        protein,
        calories: 2050.0,
        water: 3.5,
        sleep: 7.5,
        notes: None,
    }
}

#[tokio::test]
async fn test_first_load_creates_default_profile() {
    let store = common::setup_test_store().await;

    let repo = ProfileRepository::load(store.clone()).await;

    assert_eq!(repo.profile().current_weight, 95.0);
    assert_eq!(repo.profile().target_weight, 80.0);
    assert_eq!(repo.profile().nutrition_targets, NutritionTargets::default());

    let stored: Option<StoredProfile> = store.get_item(Collection::UserProfile, PROFILE_ID).await;
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_update_profile_persists() {
    let store = common::setup_test_store().await;
    let mut repo = ProfileRepository::load(store.clone()).await;

    assert!(
        repo.update_profile(ProfileUpdate {
            name: Some("Sam".to_string()),
            target_weight: Some(78.0),
            ..Default::default()
        })
        .await
    );

    let reloaded = ProfileRepository::load(store).await;
    assert_eq!(reloaded.profile().name, "Sam");
    assert_eq!(reloaded.profile().target_weight, 78.0);
    assert_eq!(reloaded.profile().current_weight, 95.0);
}

#[tokio::test]
async fn test_weigh_in_sets_current_weight() {
    let store = common::setup_test_store().await;
    let mut repo = ProfileRepository::load(store.clone()).await;

    assert!(
        repo.add_weigh_in(NewWeighIn {
            date: common::fixed_now(),
            weight: 91.0,
            waist: Some(98.0),
            notes: None,
        })
        .await
    );

    assert_eq!(repo.profile().current_weight, 91.0);
    assert_eq!(repo.profile().weekly_weigh_ins.len(), 1);
    let id = repo.profile().weekly_weigh_ins[0].id.clone();
    assert!(id.starts_with("weighin-"));

    let progress = repo.weight_progress();
    assert_eq!(progress.lost_so_far, 4.0);

    assert!(repo.delete_weigh_in(&id).await);
    let reloaded = ProfileRepository::load(store).await;
    assert!(reloaded.profile().weekly_weigh_ins.is_empty());
}

#[tokio::test]
async fn test_nutrition_log_replaces_same_date() {
    let mut repo = ProfileRepository::load(common::setup_test_store().await).await;

    repo.add_nutrition_log(nutrition(10, 150.0)).await;
    let first_id = repo.profile().nutrition_logs[0].id.clone();
    repo.add_nutrition_log(nutrition(11, 160.0)).await;
    repo.add_nutrition_log(nutrition(10, 175.0)).await;

    let logs = &repo.profile().nutrition_logs;
    assert_eq!(logs.len(), 2);
    let replaced = logs
        .iter()
        .find(|l| l.date == NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
        .unwrap();
    assert_eq!(replaced.id, first_id);
    assert_eq!(replaced.protein, 175.0);
}

#[tokio::test]
async fn test_update_nutrition_targets() {
    let store = common::setup_test_store().await;
    let mut repo = ProfileRepository::load(store.clone()).await;
    let targets = NutritionTargets {
        protein: 180.0,
        ..NutritionTargets::default()
    };

    assert!(repo.update_nutrition_targets(targets).await);

    let reloaded = ProfileRepository::load(store).await;
    assert_eq!(reloaded.profile().nutrition_targets.protein, 180.0);
}

#[tokio::test]
async fn test_legacy_record_is_migrated_and_saved() {
    let store = common::setup_flat_store().await;
    let legacy: StoredProfile = serde_json::from_str(
        r#"{
            "id": "user-profile-main",
            "currentWeight": 90.0,
            "targetWeight": 80.0,
            "height": 1.8,
            "startDate": "2024-01-01T00:00:00Z",
            "weeklyWeighIns": []
        }"#,
    )
    .unwrap();
    store.save_item(Collection::UserProfile, &legacy).await;

    let repo = ProfileRepository::load(store.clone()).await;
    assert_eq!(repo.profile().start_weight, 90.0);
    assert!(repo.profile().nutrition_logs.is_empty());
    assert_eq!(repo.profile().nutrition_targets, NutritionTargets::default());

    let stored: StoredProfile = store
        .get_item(Collection::UserProfile, PROFILE_ID)
        .await
        .unwrap();
    assert_eq!(stored.start_weight, Some(90.0));
    assert!(stored.nutrition_logs.is_some());
    assert!(stored.nutrition_targets.is_some());
}

#[tokio::test]
async fn test_load_survives_unwritable_store() {
    let store = RecordStore::with_backend(Arc::new(FlatBackend::unavailable("read-only")));

    let mut repo = ProfileRepository::load(store).await;
    assert_eq!(repo.profile().current_weight, 95.0);

    let updated = repo
        .update_profile(ProfileUpdate {
            current_weight: Some(90.0),
            ..Default::default()
        })
        .await;
    assert!(!updated);
    assert_eq!(repo.profile().current_weight, 95.0);
}
