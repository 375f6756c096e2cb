use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cosmolog::config::Config;
use cosmolog::dashboard::DashboardSummary;
use cosmolog::repositories::{
    CustomWorkoutRepository, ProfileRepository, SessionHistory, SessionRepository,
};
use cosmolog::store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cosmolog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let store = RecordStore::new(config.store_options());
    let backend = store.init().await;
    tracing::info!("Record store ready ({})", backend.as_str());

    let history = SessionHistory::load(SessionRepository::new(store.clone())).await;
    let profile = ProfileRepository::load(store.clone()).await;
    let custom_workouts = CustomWorkoutRepository::load(store.clone()).await;

    let stats = history.stats();
    tracing::info!(
        "{} workouts, {} completed sets, {} custom templates",
        stats.total_workouts,
        stats.total_sets_completed,
        custom_workouts.workouts().len()
    );

    let progress = profile.weight_progress();
    tracing::info!(
        "Weight {:.1} -> {:.1} ({:.0}% of goal)",
        progress.current_weight,
        progress.target_weight,
        progress.percent_complete
    );

    let summary = DashboardSummary::build(history.sessions(), Utc::now());
    tracing::info!(
        "Streak {} days ({}), {} badges earned",
        summary.streak.current_streak,
        summary.streak.streak_status.as_str(),
        summary.achieved_badges()
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
