//! Persistence for finished matches and player profiles.
//!
//! Everything is stored as one JSON file per record under a data directory,
//! so the on-disk layout stays inspectable and a corrupt file only costs
//! that one record.

mod json_store;
mod match_store;
mod profile;
mod record;

pub(crate) use json_store::{JsonStore, Storable};

pub use match_store::MatchStore;
pub use profile::{PlayerProfile, ProfileStore};
pub use record::{MatchOrigin, MatchRecord, TeamEntry};

use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Current unix timestamp in seconds.
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
