use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreRecord;

pub const PROFILE_ID: &str = "user-profile-main";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub protein: f64,
    pub calories_min: f64,
    pub calories_max: f64,
    pub water_min: f64,
    pub water_max: f64,
    pub sleep_min: f64,
    pub sleep_max: f64,
}

impl Default for NutritionTargets {
    fn default() -> Self {
        Self {
            protein: 170.0,
            calories_min: 2000.0,
            calories_max: 2100.0,
            water_min: 3.0,
            water_max: 4.0,
            sleep_min: 7.0,
            sleep_max: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeighIn {
    pub id: String,
    pub date: DateTime<Utc>,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewWeighIn {
    pub date: DateTime<Utc>,
    pub weight: f64,
    pub waist: Option<f64>,
    pub notes: Option<String>,
}

/// Daily nutrition entry. At most one per calendar `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionLog {
    pub id: String,
    pub date: NaiveDate,
    /// grams
    pub protein: f64,
    pub calories: f64,
    /// liters
    pub water: f64,
    /// hours
    pub sleep: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNutritionLog {
    pub date: NaiveDate,
    pub protein: f64,
    pub calories: f64,
    pub water: f64,
    pub sleep: f64,
    pub notes: Option<String>,
}

impl NewNutritionLog {
    pub fn into_log(self, id: String) -> NutritionLog {
        NutritionLog {
            id,
            date: self.date,
            protein: self.protein,
            calories: self.calories,
            water: self.water,
            sleep: self.sleep,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub current_weight: f64,
    pub target_weight: f64,
    pub start_weight: f64,
    pub height: f64,
    pub age: Option<u32>,
    pub start_date: DateTime<Utc>,
    pub weekly_weigh_ins: Vec<WeighIn>,
    pub nutrition_logs: Vec<NutritionLog>,
    pub nutrition_targets: NutritionTargets,
}

impl UserProfile {
    pub fn default_at(start_date: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            current_weight: 95.0,
            target_weight: 80.0,
            start_weight: 95.0,
            height: 1.74,
            age: None,
            start_date,
            weekly_weigh_ins: Vec::new(),
            nutrition_logs: Vec::new(),
            nutrition_targets: NutritionTargets::default(),
        }
    }

    pub fn weight_progress(&self) -> WeightProgress {
        let start_weight = if self.start_weight > 0.0 {
            self.start_weight
        } else {
            self.weekly_weigh_ins
                .first()
                .map(|w| w.weight)
                .unwrap_or(self.current_weight)
        };
        let total_to_lose = start_weight - self.target_weight;
        let lost_so_far = start_weight - self.current_weight;
        let percent_complete = if total_to_lose > 0.0 {
            lost_so_far / total_to_lose * 100.0
        } else {
            0.0
        };

        WeightProgress {
            start_weight,
            current_weight: self.current_weight,
            target_weight: self.target_weight,
            lost_so_far,
            remaining: self.current_weight - self.target_weight,
            percent_complete: percent_complete.clamp(0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProgress {
    pub start_weight: f64,
    pub current_weight: f64,
    pub target_weight: f64,
    pub lost_so_far: f64,
    pub remaining: f64,
    pub percent_complete: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub start_weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<u32>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut UserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(weight) = self.current_weight {
            profile.current_weight = weight;
        }
        if let Some(weight) = self.target_weight {
            profile.target_weight = weight;
        }
        if let Some(weight) = self.start_weight {
            profile.start_weight = weight;
        }
        if let Some(height) = self.height {
            profile.height = height;
        }
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
    }
}

/// Persisted shape of the profile. Fields added after the first release are
/// optional so older records still decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub current_weight: f64,
    pub target_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_weight: Option<f64>,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub weekly_weigh_ins: Vec<WeighIn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_logs: Option<Vec<NutritionLog>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_targets: Option<NutritionTargets>,
}

impl StoredProfile {
    /// Fill in fields missing from older records. The flag is true when
    /// anything had to be filled and the record should be written back.
    pub fn migrate(self) -> (UserProfile, bool) {
        let needs_save = self.nutrition_logs.is_none()
            || self.nutrition_targets.is_none()
            || self.start_weight.is_none();

        let start_weight = match self.start_weight {
            Some(weight) if weight > 0.0 => weight,
            _ => self.current_weight,
        };

        let profile = UserProfile {
            name: self.name,
            current_weight: self.current_weight,
            target_weight: self.target_weight,
            start_weight,
            height: self.height,
            age: self.age,
            start_date: self.start_date,
            weekly_weigh_ins: self.weekly_weigh_ins,
            nutrition_logs: self.nutrition_logs.unwrap_or_default(),
            nutrition_targets: self.nutrition_targets.unwrap_or_default(),
        };
        (profile, needs_save)
    }
}

impl From<&UserProfile> for StoredProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: PROFILE_ID.to_string(),
            name: profile.name.clone(),
            current_weight: profile.current_weight,
            target_weight: profile.target_weight,
            start_weight: Some(profile.start_weight),
            height: profile.height,
            age: profile.age,
            start_date: profile.start_date,
            weekly_weigh_ins: profile.weekly_weigh_ins.clone(),
            nutrition_logs: Some(profile.nutrition_logs.clone()),
            nutrition_targets: Some(profile.nutrition_targets),
        }
    }
}

impl StoreRecord for StoredProfile {
    fn record_id(&self) -> &str {
        &self.id
    }
}
