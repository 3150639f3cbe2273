//! Saved games live in an opaque key-value blob store owned by whoever embeds the engine. We
//! only decide what goes under which key.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use quoridor_game_types::{
    wire_representation::{SavedGameRecord, WireGameState},
    GameState, LoadError,
};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::StoreError;

/// Key holding the saved game list, newest first
pub const SAVES_KEY: &str = "quoridor-saves";

/// Key holding a single state waiting to be picked up by a new session
pub const CURRENT_KEY: &str = "quoridor-current";

pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: FxHashMap<String, String>,
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.blobs.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// The saved game list and the hand-off slot, on top of any [BlobStore]
#[derive(Debug, Clone, Default)]
pub struct SaveSlots<S> {
    store: S,
}

impl<S: BlobStore> SaveSlots<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Every saved game, newest first
    pub fn saved_games(&self) -> Result<Vec<SavedGameRecord>, StoreError> {
        match self.store.get(SAVES_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json).map_err(LoadError::from)?),
            None => Ok(vec![]),
        }
    }

    /// Add `state` to the front of the saved game list
    pub fn save_game(&mut self, state: &GameState) -> Result<SavedGameRecord, StoreError> {
        let id = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default()
            .to_string();
        let date = chrono::Local::now().format("%d/%m/%Y, %H:%M:%S").to_string();
        let record = SavedGameRecord::new(id, date, state);

        let mut games = self.saved_games()?;
        games.insert(0, record.clone());
        self.store.put(
            SAVES_KEY,
            serde_json::to_string(&games).map_err(StoreError::Encode)?,
        )?;

        info!(id = %record.id, saved_games = games.len(), "Saved game");
        Ok(record)
    }

    /// Put `state` in the hand-off slot, replacing whatever was there
    pub fn stage(&mut self, state: &GameState) -> Result<(), StoreError> {
        let json = serde_json::to_string(&WireGameState::from(state)).map_err(StoreError::Encode)?;
        self.store.put(CURRENT_KEY, json)
    }

    /// Take the state out of the hand-off slot, leaving it empty.
    ///
    /// The slot is emptied even when its contents turn out to be invalid, so a bad record
    /// can't get stuck there.
    pub fn take_current(&mut self) -> Result<Option<GameState>, StoreError> {
        let Some(json) = self.store.get(CURRENT_KEY)? else {
            return Ok(None);
        };
        self.store.remove(CURRENT_KEY)?;

        let state = GameState::from_json(&json)?;
        debug!("Picked up staged game");

        Ok(Some(state))
    }
}

#[cfg(test)]
mod tests {
    use quoridor_game_types::{Action, Position};

    use super::*;

    fn played() -> GameState {
        GameState::new()
            .apply(Action::Move(Position { row: 1, col: 4 }))
            .and_then(|t| t.state.apply(Action::Decline))
            .unwrap()
            .state
    }

    #[test]
    fn test_newest_save_comes_first() {
        let mut slots = SaveSlots::new(MemoryStore::default());

        slots.save_game(&GameState::new()).unwrap();
        slots.save_game(&played()).unwrap();

        let games = slots.saved_games().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_state().unwrap(), played());
        assert_eq!(games[1].game_state().unwrap(), GameState::new());
    }

    #[test]
    fn test_staged_state_is_taken_once() {
        let mut slots = SaveSlots::new(MemoryStore::default());

        slots.stage(&played()).unwrap();

        assert_eq!(slots.take_current().unwrap(), Some(played()));
        assert_eq!(slots.take_current().unwrap(), None);
    }

    #[test]
    fn test_bad_staged_state_is_refused_and_cleared() {
        let mut store = MemoryStore::default();
        store
            .put(CURRENT_KEY, r#"{"players": "nope"}"#.to_owned())
            .unwrap();
        let mut slots = SaveSlots::new(store);

        assert!(matches!(
            slots.take_current(),
            Err(StoreError::Load(LoadError::Malformed(_)))
        ));
        assert!(slots.store().get(CURRENT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_legacy_save_list_loads() {
        let mut store = MemoryStore::default();
        store
            .put(SAVES_KEY, include_str!("../fixtures/saved_games.json").to_owned())
            .unwrap();
        let slots = SaveSlots::new(store);

        let games = slots.saved_games().unwrap();
        assert_eq!(games.len(), 2);
        assert!(games.iter().all(|game| game.game_state().is_ok()));
    }

    #[test]
    fn test_unreadable_save_list_is_malformed() {
        let mut store = MemoryStore::default();
        store
            .put(SAVES_KEY, include_str!("../fixtures/malformed_saves.json").to_owned())
            .unwrap();
        let slots = SaveSlots::new(store);

        assert!(matches!(
            slots.saved_games(),
            Err(StoreError::Load(LoadError::Malformed(_)))
        ));
    }

    #[test]
    fn test_file_store_round_trips_blobs() {
        let dir = std::env::temp_dir().join(format!("quoridor-store-{}", std::process::id()));
        let mut store = FileStore::new(&dir).unwrap();

        assert_eq!(store.get("missing").unwrap(), None);
        store.put("key", "value".to_owned()).unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));
        store.remove("key").unwrap();
        store.remove("key").unwrap();
        assert_eq!(store.get("key").unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }
}
