use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{BackendKind, Collection, IndexField, RecordBackend};
use crate::error::{AppError, Result};

/// Fallback backend: a flat namespace of `"{collection}-{id}"` keys.
///
/// The whole namespace is rewritten to a single JSON file after every
/// mutation. Without a path the records only live in memory.
pub struct FlatBackend {
    path: Option<PathBuf>,
    quota_bytes: Option<usize>,
    entries: Mutex<BTreeMap<String, String>>,
    /// Set when the file could not be read. Every operation then fails.
    load_error: Option<String>,
}

impl FlatBackend {
    /// Load the namespace from `path`. A file that is not valid JSON is
    /// moved aside to `<path>.corrupt` and the store starts empty at `path`.
    pub fn open(path: Option<PathBuf>, quota_bytes: Option<usize>) -> Result<Self> {
        let entries = match &path {
            Some(path) if path.exists() => load_entries(path)?,
            _ => BTreeMap::new(),
        };

        Ok(Self {
            path,
            quota_bytes,
            entries: Mutex::new(entries),
            load_error: None,
        })
    }

    pub fn in_memory(quota_bytes: Option<usize>) -> Self {
        Self {
            path: None,
            quota_bytes,
            entries: Mutex::new(BTreeMap::new()),
            load_error: None,
        }
    }

    /// A backend whose file could not be loaded. Reads and writes all
    /// report `error`, so callers see failures instead of lost writes.
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            path: None,
            quota_bytes: None,
            entries: Mutex::new(BTreeMap::new()),
            load_error: Some(error.into()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        if let Some(error) = &self.load_error {
            return Err(AppError::Internal(format!("flat store unavailable: {}", error)));
        }
        self.entries
            .lock()
            .map_err(|_| AppError::Internal("flat store lock poisoned".to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        match &self.path {
            Some(path) => write_atomically(path, &serde_json::to_string(entries)?),
            None => Ok(()),
        }
    }
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str(&contents) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            let aside = corrupt_path(path);
            fs::rename(path, &aside)?;
            tracing::warn!(
                "Flat store file {} is not valid JSON ({}), moved to {}",
                path.display(),
                e,
                aside.display()
            );
            Ok(BTreeMap::new())
        }
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

fn record_key(collection: Collection, id: &str) -> String {
    format!("{}-{}", collection.as_str(), id)
}

fn collection_prefix(collection: Collection) -> String {
    format!("{}-", collection.as_str())
}

fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl RecordBackend for FlatBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Flat
    }

    fn put(&self, collection: Collection, id: &str, data: &str) -> Result<()> {
        let mut entries = self.lock()?;
        let key = record_key(collection, id);

        if let Some(quota) = self.quota_bytes {
            let replaced = entries.get(&key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = used_bytes(&entries) - replaced + key.len() + data.len();
            if needed > quota {
                return Err(AppError::QuotaExceeded { needed, quota });
            }
        }

        let previous = entries.insert(key.clone(), data.to_string());
        if let Err(e) = self.persist(&entries) {
            match previous {
                Some(previous) => entries.insert(key, previous),
                None => entries.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Option<String>> {
        let entries = self.lock()?;
        Ok(entries.get(&record_key(collection, id)).cloned())
    }

    fn get_all(&self, collection: Collection) -> Result<Vec<String>> {
        let entries = self.lock()?;
        let prefix = collection_prefix(collection);
        Ok(entries
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn find_by_index(
        &self,
        collection: Collection,
        field: IndexField,
        value: &str,
    ) -> Result<Vec<String>> {
        let mut matches = Vec::new();
        for data in self.get_all(collection)? {
            let doc: serde_json::Value = serde_json::from_str(&data)?;
            if doc.get(field.field_name()).and_then(|v| v.as_str()) == Some(value) {
                matches.push(data);
            }
        }
        Ok(matches)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut entries = self.lock()?;
        let key = record_key(collection, id);
        if let Some(previous) = entries.remove(&key) {
            if let Err(e) = self.persist(&entries) {
                entries.insert(key, previous);
                return Err(e);
            }
        }
        Ok(())
    }

    fn clear(&self, collection: Collection) -> Result<()> {
        let mut entries = self.lock()?;
        let prefix = collection_prefix(collection);
        let snapshot = entries.clone();
        entries.retain(|k, _| !k.starts_with(&prefix));
        if let Err(e) = self.persist(&entries) {
            *entries = snapshot;
            return Err(e);
        }
        Ok(())
    }
}
