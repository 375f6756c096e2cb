use chrono::NaiveDate;

use crate::models::{SessionStats, WorkoutSession};
use crate::store::{Collection, RecordStore};

#[derive(Clone)]
pub struct SessionRepository {
    store: RecordStore,
}

impl SessionRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Persist a finished session. Invalid sessions are rejected without
    /// touching the store.
    pub async fn save_session(&self, session: &WorkoutSession) -> bool {
        if let Err(e) = session.validate() {
            tracing::warn!("Refusing to save session {}: {}", session.id, e);
            return false;
        }
        self.store
            .save_item(Collection::WorkoutSessions, session)
            .await
    }

    pub async fn load_sessions(&self) -> Vec<WorkoutSession> {
        self.store
            .get_all_items(Collection::WorkoutSessions)
            .await
    }

    pub async fn find_session(&self, id: &str) -> Option<WorkoutSession> {
        self.store
            .get_item(Collection::WorkoutSessions, id)
            .await
    }

    pub async fn delete_session(&self, id: &str) -> bool {
        self.store
            .delete_item(Collection::WorkoutSessions, id)
            .await
    }

    pub async fn clear_sessions(&self) -> bool {
        self.store.clear_store(Collection::WorkoutSessions).await
    }
}

/// The caller's copy of the session list. Successful writes update it in
/// place, so it never has to be reloaded after a save.
pub struct SessionHistory {
    repo: SessionRepository,
    sessions: Vec<WorkoutSession>,
}

impl SessionHistory {
    pub async fn load(repo: SessionRepository) -> Self {
        let sessions = repo.load_sessions().await;
        tracing::debug!("Loaded {} workout sessions", sessions.len());
        Self { repo, sessions }
    }

    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }

    pub async fn save(&mut self, session: WorkoutSession) -> bool {
        if !self.repo.save_session(&session).await {
            return false;
        }
        self.sessions.push(session);
        true
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        if !self.repo.delete_session(id).await {
            return false;
        }
        self.sessions.retain(|s| s.id != id);
        true
    }

    pub async fn clear(&mut self) -> bool {
        if !self.repo.clear_sessions().await {
            return false;
        }
        self.sessions.clear();
        true
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> Vec<&WorkoutSession> {
        let mut sorted: Vec<&WorkoutSession> = self.sessions.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.truncate(limit);
        sorted
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&WorkoutSession> {
        self.sessions
            .iter()
            .filter(|s| s.date.date_naive() == date)
            .collect()
    }

    pub fn stats(&self) -> SessionStats {
        let mut stats = SessionStats {
            total_workouts: self.sessions.len(),
            ..Default::default()
        };
        for session in &self.sessions {
            *stats
                .workouts_by_type
                .entry(session.workout_type)
                .or_insert(0) += 1;
            stats.total_sets_completed += session.completed_set_count();
        }
        stats
    }
}
