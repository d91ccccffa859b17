pub mod export;
mod game;
mod roster;
mod round;
pub mod score;

pub use round::{parse_assignment, validate_assignment};

use crate::error::{GameResult, StorageError};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::types::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Store shared by the HTTP and WebSocket handlers
pub type SharedStore = Arc<Mutex<GameStore>>;

/// Owns the canonical game state and its durable copy.
///
/// Every mutation goes through [`GameStore::commit`]: the operation runs on a
/// working copy, and only a successful result replaces the state and is
/// written to storage.
pub struct GameStore {
    state: GameState,
    storage: Box<dyn KeyValueStore>,
    key: String,
    persist_warning: Option<String>,
}

impl GameStore {
    /// Rehydrate from the storage slot, falling back to an empty game
    pub fn load(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = match storage.get(&key) {
            Ok(Some(json)) => match export::parse_saved_state(&json) {
                Ok(state) => {
                    tracing::info!(
                        "Loaded game state from '{}' ({} known players, {} in roster)",
                        key,
                        state.profiles.len(),
                        state.players.len()
                    );
                    state
                }
                Err(e) => {
                    tracing::warn!("Saved state in '{}' is unreadable, starting fresh: {}", key, e);
                    GameState::default()
                }
            },
            Ok(None) => {
                tracing::info!("No saved state in '{}', starting fresh", key);
                GameState::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read saved state from '{}': {}", key, e);
                GameState::default()
            }
        };

        Self {
            state,
            storage,
            key,
            persist_warning: None,
        }
    }

    /// A store backed by process memory only
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()), DEFAULT_STATE_KEY)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize the full state into the slot
    pub fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.state)?;
        self.storage.set(&self.key, &json)
    }

    /// Save, downgrading failures to a warning for the caller to surface
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!("Failed to persist game state: {}", e);
            self.persist_warning = Some(format!("Progress could not be saved: {}", e));
        }
    }

    /// The last persistence failure, if any, clearing it
    pub fn take_persist_warning(&mut self) -> Option<String> {
        self.persist_warning.take()
    }

    /// Run `op` against a copy of the state and install it only on success
    pub fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut GameState) -> GameResult<T>,
    ) -> GameResult<T> {
        let mut next = self.state.clone();
        let out = op(&mut next)?;
        self.state = next;
        self.persist();
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::storage::FileStore;

    /// Storage that accepts nothing
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("quota exceeded")))
        }
    }

    pub(crate) fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// A store with a three player roster of Alice, Bob and Cara
    pub(crate) fn three_player_store() -> GameStore {
        let mut store = GameStore::in_memory();
        store.select_player_count(3).unwrap();
        store.start_game(names(&["Alice", "Bob", "Cara"])).unwrap();
        store
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let store = GameStore::in_memory();
        assert_eq!(store.state(), &GameState::default());
        assert_eq!(store.state().current_screen, Screen::PlayerCountSection);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GameStore::load(Box::new(FileStore::new(dir.path())), "slot");
        store.select_player_count(3).unwrap();
        store
            .set_player_photo(1, PhotoBlob("data:image/png;base64,AAAA".to_string()))
            .unwrap();
        store.start_game(names(&["Alice", "Bob", "Cara"])).unwrap();
        store
            .submit_round(&names(&["Badshah", "Sepahi", "Gashti"]))
            .unwrap();

        let reloaded = GameStore::load(Box::new(FileStore::new(dir.path())), "slot");
        assert_eq!(reloaded.state(), store.state());
    }

    #[test]
    fn test_save_without_mutation_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileStore::new(dir.path());
        let mut store = GameStore::load(Box::new(files.clone()), "slot");
        store.select_player_count(4).unwrap();
        let before = files.get("slot").unwrap();

        let reloaded = GameStore::load(Box::new(files.clone()), "slot");
        reloaded.save().unwrap();

        assert_eq!(files.get("slot").unwrap(), before);
    }

    #[test]
    fn test_corrupt_slot_starts_fresh() {
        let storage = MemoryStore::new();
        storage.set("slot", "{not json").unwrap();

        let store = GameStore::load(Box::new(storage), "slot");
        assert_eq!(store.state(), &GameState::default());
    }

    #[test]
    fn test_failed_operation_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileStore::new(dir.path());
        let mut store = GameStore::load(Box::new(files.clone()), "slot");
        store.select_player_count(3).unwrap();
        store.start_game(names(&["Alice", "Bob", "Cara"])).unwrap();
        let before_state = store.state().clone();
        let before_disk = files.get("slot").unwrap();

        let result = store.submit_round(&names(&["Badshah", "Badshah", "Gashti"]));
        assert_eq!(result, Err(GameError::DuplicateTitle(Title::Badshah)));
        assert_eq!(store.state(), &before_state);
        assert_eq!(files.get("slot").unwrap(), before_disk);
    }

    #[test]
    fn test_persist_failure_is_a_warning() {
        let mut store = GameStore::load(Box::new(BrokenStore), "slot");

        store.select_player_count(5).unwrap();
        assert_eq!(store.state().player_count, Some(PlayerCount::new(5).unwrap()));

        let warning = store.take_persist_warning().unwrap();
        assert!(warning.contains("quota exceeded"));
        assert!(store.take_persist_warning().is_none());
    }
}
