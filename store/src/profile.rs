use serde::{Deserialize, Serialize};
use stats::PlayerStats;
use std::path::PathBuf;

use crate::{JsonStore, MatchRecord, Storable, StoreError};

/// A player known to the store, with career totals across their matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub profile_id: String,
    pub name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub stats: PlayerStats,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            profile_id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            matches_played: 0,
            wins: 0,
            losses: 0,
            stats: PlayerStats::default(),
        }
    }
}

impl Storable for PlayerProfile {
    fn id(&self) -> &str {
        &self.profile_id
    }
}

/// Persistence layer for player profiles. Uses JSON files in a directory.
pub struct ProfileStore {
    inner: JsonStore<PlayerProfile>,
}

impl ProfileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            inner: JsonStore::new(data_dir.join("profiles")),
        }
    }

    /// Save a profile. Returns the profile_id.
    pub fn save(&self, profile: &PlayerProfile) -> Result<String, StoreError> {
        self.inner.save(profile)
    }

    /// Load a specific profile by id.
    pub fn load(&self, id: &str) -> Result<Option<PlayerProfile>, StoreError> {
        self.inner.load(id)
    }

    /// List all profiles sorted by name.
    pub fn list(&self) -> Result<Vec<PlayerProfile>, StoreError> {
        let mut profiles = self.inner.load_all()?;
        profiles.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(profiles)
    }

    /// Find a profile by name, ignoring case and surrounding whitespace,
    /// creating and saving a fresh one when no match exists.
    pub fn resolve(&self, name: &str) -> Result<PlayerProfile, StoreError> {
        let wanted = name.trim().to_lowercase();
        let existing = self
            .inner
            .load_all()?
            .into_iter()
            .find(|p| p.name.trim().to_lowercase() == wanted);
        match existing {
            Some(profile) => Ok(profile),
            None => {
                let profile = PlayerProfile::new(name.trim());
                self.save(&profile)?;
                Ok(profile)
            }
        }
    }

    /// Fold a finished match into the career totals of every player on it.
    /// Wins and losses only move when the match has a winner.
    pub fn apply_match_result(&self, record: &MatchRecord) -> Result<(), StoreError> {
        for player in record.players() {
            if player.profile_id.is_empty() {
                continue;
            }
            let mut profile = self
                .load(&player.profile_id)?
                .unwrap_or_else(|| PlayerProfile {
                    profile_id: player.profile_id.clone(),
                    ..PlayerProfile::new(player.name.clone())
                });
            profile.matches_played += 1;
            if let Some(winner) = record.winner {
                if player.seat.team() == winner {
                    profile.wins += 1;
                } else {
                    profile.losses += 1;
                }
            }
            if let Some(line) = record.stats.get(&player.profile_id) {
                profile.stats.add(line);
            }
            self.save(&profile)?;
        }
        Ok(())
    }

    /// Delete a profile by id.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete(id)
    }
}
