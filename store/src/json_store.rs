use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Trait for types that can be persisted in a [`JsonStore`].
pub trait Storable: Serialize + DeserializeOwned {
    fn id(&self) -> &str;
}

/// Generic JSON-file-per-record store.
pub struct JsonStore<T> {
    dir: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T: Storable> JsonStore<T> {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            _phantom: PhantomData,
        }
    }

    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn file_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Save a record. Returns the id.
    pub fn save(&self, record: &T) -> Result<String, StoreError> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(self.file_path(record.id()), json)?;
        Ok(record.id().to_string())
    }

    /// Load a record by id. Returns None if not found.
    pub fn load(&self, id: &str) -> Result<Option<T>, StoreError> {
        let path = self.file_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Load every record in the directory, skipping files that cannot be
    /// read or parsed.
    pub fn load_all(&self) -> Result<Vec<T>, StoreError> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_record::<T>(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping record file {:?}: {}", path, e),
            }
        }
        Ok(records)
    }

    /// Delete a record by id.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.file_path(id);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn read_record<T: Storable>(path: &Path) -> Result<T, StoreError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
