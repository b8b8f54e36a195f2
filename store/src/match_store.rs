use std::path::PathBuf;

use crate::{JsonStore, MatchRecord, StoreError};

/// Persistence layer for match records. Uses JSON files in a directory.
pub struct MatchStore {
    inner: JsonStore<MatchRecord>,
}

impl MatchStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            inner: JsonStore::new(data_dir.join("matches")),
        }
    }

    /// Save a match record. Returns the match_id.
    pub fn save(&self, record: &MatchRecord) -> Result<String, StoreError> {
        self.inner.save(record)
    }

    /// List all matches, sorted by created_at descending (most recent first).
    pub fn list(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let mut records = self.inner.load_all()?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Load a specific match by id.
    pub fn load(&self, id: &str) -> Result<Option<MatchRecord>, StoreError> {
        self.inner.load(id)
    }

    /// Delete a match by id.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete(id)
    }
}
