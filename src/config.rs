use std::env;
use std::path::PathBuf;

use crate::store::{BackendPreference, StoreOptions};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub store_backend: BackendPreference,
    pub fallback_path: Option<PathBuf>,
    pub fallback_quota_bytes: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:cosmolog.db?mode=rwc".to_string()),
            store_backend: env::var("STORE_BACKEND")
                .map(|s| BackendPreference::parse(&s))
                .unwrap_or_default(),
            fallback_path: match env::var("FALLBACK_STORE_PATH") {
                Ok(path) if path.is_empty() => None,
                Ok(path) => Some(PathBuf::from(path)),
                Err(_) => Some(PathBuf::from("cosmolog-store.json")),
            },
            fallback_quota_bytes: env::var("FALLBACK_STORE_QUOTA_BYTES")
                .ok()
                .and_then(|s| s.parse().ok()),
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            preference: self.store_backend,
            database_url: self.database_url.clone(),
            fallback_path: self.fallback_path.clone(),
            fallback_quota_bytes: self.fallback_quota_bytes,
        }
    }
}
