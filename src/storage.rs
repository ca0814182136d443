//! Persistence of game state, statistics, and settings.
//!
//! Values are stored as JSON strings under fixed keys. Read and write
//! failures are logged and otherwise ignored: a missing or unreadable value
//! loads as absent.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
#[cfg(all(not(feature = "std"), feature = "alloc"))]
use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::error::StorageError;
use crate::game::GameState;
use crate::options::Settings;

/// Key for the saved game.
pub const GAME_STATE_KEY: &str = "cribbage_game_state";
/// Key for lifetime statistics.
pub const STATS_KEY: &str = "cribbage_stats";
/// Key for player settings.
pub const SETTINGS_KEY: &str = "cribbage_settings";

/// Lifetime statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Games finished.
    pub games_played: u32,
    /// Games won by the user.
    pub games_won: u32,
    /// Best final score by the user.
    pub highest_score: u16,
    /// User hands or cribs counting 28 or more.
    pub perfect_hands: u32,
    /// User hands or cribs counting 29.
    pub twenty_nine_hands: u32,
}

/// A string key-value store.
pub trait Storage {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage, for tests and hosts without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Storage backed by one `<key>.json` file per key in a directory.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(feature = "std")]
impl FileStorage {
    /// Creates storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(alloc::format!("{key}.json"))
    }
}

#[cfg(feature = "std")]
fn backend_error(err: &std::io::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

#[cfg(feature = "std")]
impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(backend_error(&err)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| backend_error(&e))?;
        std::fs::write(self.path(key), value).map_err(|e| backend_error(&e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(backend_error(&err)),
        }
    }
}

/// Typed access to a [`Storage`] backend.
///
/// Every operation logs failures and carries on; loads return `None` for
/// absent or malformed values.
pub struct Persistence {
    storage: Box<dyn Storage + Send>,
}

impl Persistence {
    /// Wraps a storage backend.
    pub fn new(storage: impl Storage + Send + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))
            .and_then(|json| self.storage.write(key, &json));
        if let Err(err) = result {
            log::error!("Error saving {key}: {err}");
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = match self.storage.read(key) {
            Ok(json) => json?,
            Err(err) => {
                log::error!("Error loading {key}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                log::error!("Error loading {key}: {}", StorageError::Serialization(err.to_string()));
                None
            }
        }
    }

    /// Saves the game state.
    pub fn save_game_state(&mut self, state: &GameState) {
        self.save(GAME_STATE_KEY, state);
    }

    /// Loads the saved game state.
    #[must_use]
    pub fn load_game_state(&self) -> Option<GameState> {
        self.load(GAME_STATE_KEY)
    }

    /// Saves statistics.
    pub fn save_stats(&mut self, stats: &Stats) {
        self.save(STATS_KEY, stats);
    }

    /// Loads statistics.
    #[must_use]
    pub fn load_stats(&self) -> Option<Stats> {
        self.load(STATS_KEY)
    }

    /// Saves settings.
    pub fn save_settings(&mut self, settings: &Settings) {
        self.save(SETTINGS_KEY, settings);
    }

    /// Loads settings.
    #[must_use]
    pub fn load_settings(&self) -> Option<Settings> {
        self.load(SETTINGS_KEY)
    }

    /// Removes the saved game, statistics, and settings.
    pub fn clear_all(&mut self) {
        for key in [GAME_STATE_KEY, STATS_KEY, SETTINGS_KEY] {
            if let Err(err) = self.storage.remove(key) {
                log::error!("Error clearing {key}: {err}");
            }
        }
    }
}

impl core::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Difficulty;

    #[test]
    fn round_trips_through_memory() {
        let mut persistence = Persistence::new(MemoryStorage::new());
        assert_eq!(persistence.load_stats(), None);

        let stats = Stats {
            games_played: 3,
            games_won: 2,
            highest_score: 121,
            perfect_hands: 1,
            twenty_nine_hands: 0,
        };
        persistence.save_stats(&stats);
        assert_eq!(persistence.load_stats(), Some(stats));

        let settings = Settings::default().with_difficulty(Difficulty::Hard);
        persistence.save_settings(&settings);
        assert_eq!(persistence.load_settings(), Some(settings));

        persistence.clear_all();
        assert_eq!(persistence.load_stats(), None);
        assert_eq!(persistence.load_settings(), None);
    }

    #[test]
    fn malformed_values_load_as_absent() {
        let mut storage = MemoryStorage::new();
        storage.write(GAME_STATE_KEY, "{not json").unwrap();
        storage.write(SETTINGS_KEY, "42").unwrap();
        let persistence = Persistence::new(storage);
        assert_eq!(persistence.load_game_state(), None);
        assert_eq!(persistence.load_settings(), None);
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .write(SETTINGS_KEY, r#"{"difficulty":"medium"}"#)
            .unwrap();
        let persistence = Persistence::new(storage);
        let settings = persistence.load_settings().unwrap();
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert!(settings.sound_enabled);
    }
}
