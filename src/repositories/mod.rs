pub mod custom_workout_repo;
pub mod profile_repo;
pub mod session_repo;

pub use custom_workout_repo::CustomWorkoutRepository;
pub use profile_repo::ProfileRepository;
pub use session_repo::{SessionHistory, SessionRepository};
