//! Durable record store.
//!
//! `RecordStore` persists JSON-encoded records grouped into collections and
//! keyed by id. Two backends sit behind [`RecordBackend`]: a SQLite store
//! (preferred) and a flat key-prefix file store used when SQLite is disabled
//! or fails to open. The backend is chosen once, on the first call to
//! [`RecordStore::init`].
//!
//! Store operations never return errors. Failures are logged and reported
//! as `false`, `None` or an empty vec, so callers only need to check the
//! result.

pub mod flat;
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::error::{AppError, Result};

pub use flat::FlatBackend;
pub use sqlite::SqliteBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    WorkoutSessions,
    UserProfile,
    CustomWorkouts,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::WorkoutSessions => "workout-sessions",
            Collection::UserProfile => "user-profile",
            Collection::CustomWorkouts => "custom-workouts",
        }
    }
}

/// Record fields that can be queried with [`RecordStore::find_by_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexField {
    Date,
    WorkoutType,
}

impl IndexField {
    pub fn field_name(&self) -> &'static str {
        match self {
            IndexField::Date => "date",
            IndexField::WorkoutType => "workoutType",
        }
    }

    pub fn json_path(&self) -> &'static str {
        match self {
            IndexField::Date => "$.date",
            IndexField::WorkoutType => "$.workoutType",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Flat,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Flat => "flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// SQLite, falling back to the flat store if it cannot be opened.
    #[default]
    Auto,
    /// Skip SQLite entirely.
    Flat,
}

impl BackendPreference {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "fallback" => BackendPreference::Flat,
            _ => BackendPreference::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub preference: BackendPreference,
    pub database_url: String,
    pub fallback_path: Option<PathBuf>,
    pub fallback_quota_bytes: Option<usize>,
}

impl StoreOptions {
    /// In-memory SQLite with an in-memory fallback.
    pub fn in_memory() -> Self {
        Self {
            preference: BackendPreference::Auto,
            database_url: "sqlite::memory:".to_string(),
            fallback_path: None,
            fallback_quota_bytes: None,
        }
    }

    /// Flat store only, persisted at `path` when given.
    pub fn flat(path: Option<PathBuf>) -> Self {
        Self {
            preference: BackendPreference::Flat,
            database_url: String::new(),
            fallback_path: path,
            fallback_quota_bytes: None,
        }
    }
}

/// A record that can be kept in the store. The id is the upsert key.
pub trait StoreRecord: Serialize + DeserializeOwned + Send + 'static {
    fn record_id(&self) -> &str;
}

/// Blocking storage operations over raw JSON documents.
pub trait RecordBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn put(&self, collection: Collection, id: &str, data: &str) -> Result<()>;

    fn get(&self, collection: Collection, id: &str) -> Result<Option<String>>;

    fn get_all(&self, collection: Collection) -> Result<Vec<String>>;

    fn find_by_index(
        &self,
        collection: Collection,
        field: IndexField,
        value: &str,
    ) -> Result<Vec<String>>;

    fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    fn clear(&self, collection: Collection) -> Result<()>;
}

#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    options: StoreOptions,
    backend: OnceCell<Arc<dyn RecordBackend>>,
}

impl RecordStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                options,
                backend: OnceCell::new(),
            }),
        }
    }

    /// Wrap an already opened backend.
    pub fn with_backend(backend: Arc<dyn RecordBackend>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                options: StoreOptions::flat(None),
                backend: OnceCell::new_with(Some(backend)),
            }),
        }
    }

    /// Select and open the backend. Safe to call any number of times.
    pub async fn init(&self) -> BackendKind {
        self.backend().await.kind()
    }

    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.inner.backend.get().map(|b| b.kind())
    }

    pub async fn save_item<T: StoreRecord>(&self, collection: Collection, record: &T) -> bool {
        let id = record.record_id().to_string();
        let data = match serde_json::to_string(record) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to encode {} record {}: {}", collection.as_str(), id, e);
                return false;
            }
        };

        let log_id = id.clone();
        match self.run(move |b| b.put(collection, &id, &data)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    kind = e.kind(),
                    "Failed to save {} record {}: {}",
                    collection.as_str(),
                    log_id,
                    e
                );
                false
            }
        }
    }

    pub async fn get_item<T: StoreRecord>(&self, collection: Collection, id: &str) -> Option<T> {
        let key = id.to_string();
        let raw = match self.run(move |b| b.get(collection, &key)).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!(
                    kind = e.kind(),
                    "Failed to get {} record {}: {}",
                    collection.as_str(),
                    id,
                    e
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!("Failed to decode {} record {}: {}", collection.as_str(), id, e);
                None
            }
        }
    }

    /// All records in a collection, in no particular order.
    pub async fn get_all_items<T: StoreRecord>(&self, collection: Collection) -> Vec<T> {
        match self.run(move |b| b.get_all(collection)).await {
            Ok(raw) => decode_all(collection, raw),
            Err(e) => {
                tracing::error!(
                    kind = e.kind(),
                    "Failed to get all {} records: {}",
                    collection.as_str(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Records whose indexed field equals `value` exactly.
    pub async fn find_by_index<T: StoreRecord>(
        &self,
        collection: Collection,
        field: IndexField,
        value: &str,
    ) -> Vec<T> {
        let value = value.to_string();
        match self
            .run(move |b| b.find_by_index(collection, field, &value))
            .await
        {
            Ok(raw) => decode_all(collection, raw),
            Err(e) => {
                tracing::error!(
                    kind = e.kind(),
                    "Failed to query {} by {}: {}",
                    collection.as_str(),
                    field.field_name(),
                    e
                );
                Vec::new()
            }
        }
    }

    pub async fn delete_item(&self, collection: Collection, id: &str) -> bool {
        let key = id.to_string();
        match self.run(move |b| b.delete(collection, &key)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    kind = e.kind(),
                    "Failed to delete {} record {}: {}",
                    collection.as_str(),
                    id,
                    e
                );
                false
            }
        }
    }

    pub async fn clear_store(&self, collection: Collection) -> bool {
        match self.run(move |b| b.clear(collection)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    kind = e.kind(),
                    "Failed to clear {}: {}",
                    collection.as_str(),
                    e
                );
                false
            }
        }
    }

    async fn backend(&self) -> Arc<dyn RecordBackend> {
        self.inner
            .backend
            .get_or_init(|| open_backend(self.inner.options.clone()))
            .await
            .clone()
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn RecordBackend) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let backend = self.backend().await;
        tokio::task::spawn_blocking(move || op(backend.as_ref()))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn decode_all<T: StoreRecord>(collection: Collection, raw: Vec<String>) -> Vec<T> {
    raw.into_iter()
        .filter_map(|data| match serde_json::from_str(&data) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping undecodable {} record: {}", collection.as_str(), e);
                None
            }
        })
        .collect()
}

async fn open_backend(options: StoreOptions) -> Arc<dyn RecordBackend> {
    if options.preference == BackendPreference::Auto {
        let database_url = options.database_url.clone();
        let opened = tokio::task::spawn_blocking(move || SqliteBackend::open(&database_url))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
            .and_then(|r| r);

        match opened {
            Ok(backend) => {
                tracing::info!("Using SQLite record store: {}", options.database_url);
                return Arc::new(backend);
            }
            Err(e) => {
                tracing::warn!("SQLite store unavailable, falling back to flat store: {}", e);
            }
        }
    }

    let path = options.fallback_path.clone();
    let quota = options.fallback_quota_bytes;
    let opened = tokio::task::spawn_blocking(move || FlatBackend::open(path, quota))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
        .and_then(|r| r);

    match opened {
        Ok(backend) => {
            tracing::info!("Using flat record store");
            Arc::new(backend)
        }
        Err(e) => {
            tracing::error!("Flat store could not be loaded, store operations will fail: {}", e);
            Arc::new(FlatBackend::unavailable(e.to_string()))
        }
    }
}
