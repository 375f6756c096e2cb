use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    NewNutritionLog, NewWeighIn, NutritionTargets, ProfileUpdate, StoredProfile, UserProfile,
    WeighIn, WeightProgress, PROFILE_ID,
};
use crate::store::{Collection, RecordStore};

/// The single user profile record, held in memory between writes.
///
/// Every mutation writes the updated profile first and only replaces the
/// in-memory copy when the write succeeds.
pub struct ProfileRepository {
    store: RecordStore,
    profile: UserProfile,
}

impl ProfileRepository {
    /// Read the profile, creating the default record on first run and
    /// filling in fields that older records lack.
    pub async fn load(store: RecordStore) -> Self {
        let stored: Option<StoredProfile> =
            store.get_item(Collection::UserProfile, PROFILE_ID).await;

        let profile = match stored {
            Some(stored) => {
                let (profile, needs_save) = stored.migrate();
                if needs_save {
                    tracing::info!("Migrating stored user profile");
                    if !store
                        .save_item(Collection::UserProfile, &StoredProfile::from(&profile))
                        .await
                    {
                        tracing::warn!("Failed to save migrated user profile");
                    }
                }
                profile
            }
            None => {
                let profile = UserProfile::default_at(Utc::now());
                if !store
                    .save_item(Collection::UserProfile, &StoredProfile::from(&profile))
                    .await
                {
                    tracing::warn!("Failed to save default user profile");
                }
                profile
            }
        };

        Self { store, profile }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub async fn save_profile(&mut self, profile: UserProfile) -> bool {
        let saved = self
            .store
            .save_item(Collection::UserProfile, &StoredProfile::from(&profile))
            .await;
        if saved {
            self.profile = profile;
        }
        saved
    }

    pub async fn update_profile(&mut self, update: ProfileUpdate) -> bool {
        let mut profile = self.profile.clone();
        update.apply(&mut profile);
        self.save_profile(profile).await
    }

    /// Record a weigh-in. The weigh-in also becomes the current weight.
    pub async fn add_weigh_in(&mut self, weigh_in: NewWeighIn) -> bool {
        let mut profile = self.profile.clone();
        profile.current_weight = weigh_in.weight;
        profile.weekly_weigh_ins.push(WeighIn {
            id: format!("weighin-{}", Uuid::new_v4()),
            date: weigh_in.date,
            weight: weigh_in.weight,
            waist: weigh_in.waist,
            notes: weigh_in.notes,
        });
        self.save_profile(profile).await
    }

    pub async fn delete_weigh_in(&mut self, id: &str) -> bool {
        let mut profile = self.profile.clone();
        profile.weekly_weigh_ins.retain(|w| w.id != id);
        self.save_profile(profile).await
    }

    /// Add the day's nutrition log, replacing any log already recorded for
    /// the same date. A replaced log keeps its id.
    pub async fn add_nutrition_log(&mut self, log: NewNutritionLog) -> bool {
        let mut profile = self.profile.clone();
        match profile
            .nutrition_logs
            .iter_mut()
            .find(|existing| existing.date == log.date)
        {
            Some(existing) => {
                let id = existing.id.clone();
                *existing = log.into_log(id);
            }
            None => {
                let id = format!("nutrition-{}", Uuid::new_v4());
                profile.nutrition_logs.push(log.into_log(id));
            }
        }
        self.save_profile(profile).await
    }

    pub async fn update_nutrition_targets(&mut self, targets: NutritionTargets) -> bool {
        let mut profile = self.profile.clone();
        profile.nutrition_targets = targets;
        self.save_profile(profile).await
    }

    pub fn weight_progress(&self) -> WeightProgress {
        self.profile.weight_progress()
    }
}
