use chrono::Utc;
use uuid::Uuid;

use crate::models::{Workout, WorkoutUpdate};
use crate::store::{Collection, RecordStore};

/// User-authored workout templates, newest first.
pub struct CustomWorkoutRepository {
    store: RecordStore,
    workouts: Vec<Workout>,
}

impl CustomWorkoutRepository {
    pub async fn load(store: RecordStore) -> Self {
        let mut repo = Self {
            store,
            workouts: Vec::new(),
        };
        repo.reload().await;
        repo
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub async fn reload(&mut self) {
        let mut workouts: Vec<Workout> = self.store.get_all_items(Collection::CustomWorkouts).await;
        // Templates without a creation time sort last.
        workouts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.workouts = workouts;
    }

    pub async fn save_workout(&mut self, mut workout: Workout) -> bool {
        workout.is_custom = true;
        if workout.created_at.is_none() {
            workout.created_at = Some(Utc::now());
        }

        if !self
            .store
            .save_item(Collection::CustomWorkouts, &workout)
            .await
        {
            return false;
        }
        self.reload().await;
        true
    }

    /// Apply `update` to a known template. Unknown ids are not created.
    pub async fn update_workout(&mut self, id: &str, update: WorkoutUpdate) -> bool {
        let Some(existing) = self.find(id) else {
            tracing::warn!("Cannot update unknown custom workout {}", id);
            return false;
        };

        let mut updated = existing.clone();
        update.apply(&mut updated);
        if !self
            .store
            .save_item(Collection::CustomWorkouts, &updated)
            .await
        {
            return false;
        }
        self.reload().await;
        true
    }

    pub async fn delete_workout(&mut self, id: &str) -> bool {
        if !self.store.delete_item(Collection::CustomWorkouts, id).await {
            return false;
        }
        self.reload().await;
        true
    }

    /// Copy a template under a new id, named "<name> (Copy)".
    pub async fn duplicate_workout(&mut self, id: &str) -> Option<Workout> {
        let original = self.find(id)?;

        let duplicate = Workout {
            id: new_custom_id(),
            name: format!("{} (Copy)", original.name),
            created_at: Some(Utc::now()),
            ..original.clone()
        };

        if self.save_workout(duplicate.clone()).await {
            Some(duplicate)
        } else {
            None
        }
    }

    pub async fn clear_all(&mut self) -> bool {
        if !self.store.clear_store(Collection::CustomWorkouts).await {
            return false;
        }
        self.workouts.clear();
        true
    }
}

pub fn new_custom_id() -> String {
    format!("custom-{}", Uuid::new_v4())
}
