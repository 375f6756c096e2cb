pub mod overload;
pub mod personal_record;
pub mod streak;
pub mod user;
pub mod workout;
pub mod workout_session;

pub use overload::{
    Confidence, ExerciseHistory, OverloadInfo, OverloadRecommendation, RecommendationType,
    RepRange, SessionData, Trend,
};
pub use personal_record::{CurrentSet, PersonalRecord, PrType, PrUpdate};
pub use streak::{BadgeMetric, StreakBadge, StreakData, StreakStatus, WeeklyFrequency};
pub use user::{
    NewNutritionLog, NewWeighIn, NutritionLog, NutritionTargets, ProfileUpdate, StoredProfile,
    UserProfile, WeighIn, WeightProgress, PROFILE_ID,
};
pub use workout::{ExerciseTemplate, Workout, WorkoutUpdate};
pub use workout_session::{
    CompletedSet, ExerciseProgress, SessionStats, WorkoutSession, WorkoutType,
};
