//! Key-value persistence for discovery progress and the last camera transform.
//!
//! The engine never owns the storage medium. Hosts hand in any
//! [`KeyValueStore`]: browser `localStorage` (see [`crate::wasm`]), a JSON file
//! for the simulation driver, or [`MemoryStore`] for tests.
//!
//! Reads are forgiving: a missing key, an unreadable store or corrupt JSON all
//! degrade to "nothing stored" with a warning. Write failures are logged and
//! dropped; nothing here surfaces to the player.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::camera::CameraState;

/// Key holding the selected player record (`{"id": ..., "name": ...}`).
pub const PLAYER_KEY: &str = "phantasm:player";

/// Key holding the last settled camera transform.
pub const LAST_TRANSFORM_KEY: &str = "phantasm:island:lastTransform";

const DISCOVERED_KEY_PREFIX: &str = "phantasm:island:discovered:";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached (no window, quota, private mode).
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// String key-value storage. Mirrors the browser `Storage` interface.
pub trait KeyValueStore {
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backing medium can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns a [`StoreError`] when the value can't be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns a [`StoreError`] when the key can't be removed.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same entries, so a test can keep a
/// handle after giving one to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Raw value for `key`, bypassing the trait.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// A single JSON object on disk holding every key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Identity that discovery progress is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.trim().is_empty() { Self::guest() } else { Self(id) }
    }

    #[must_use]
    pub fn guest() -> Self {
        Self("guest".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the selected player from [`PLAYER_KEY`], falling back to `guest`.
    #[must_use]
    pub fn from_store(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(PLAYER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::guest(),
            Err(err) => {
                tracing::warn!(%err, "player record unreadable");
                return Self::guest();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(record) => match record.get("id") {
                Some(Value::String(id)) => Self::new(id.clone()),
                Some(Value::Number(n)) => Self::new(n.to_string()),
                _ => Self::guest(),
            },
            Err(err) => {
                tracing::warn!(%err, "player record is not valid JSON");
                Self::guest()
            }
        }
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::guest()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage key for a player's discovered hotspot ids.
#[must_use]
pub fn discovered_key(player: &PlayerId) -> String {
    format!("{DISCOVERED_KEY_PREFIX}{player}")
}

/// Camera transform saved for the "back to the map" restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl From<CameraState> for TransformSnapshot {
    fn from(state: CameraState) -> Self {
        Self { x: state.x, y: state.y, scale: state.scale }
    }
}

impl From<TransformSnapshot> for CameraState {
    fn from(snapshot: TransformSnapshot) -> Self {
        CameraState::new(snapshot.x, snapshot.y, snapshot.scale)
    }
}

/// A store bound to a player identity.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    player: PlayerId,
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence").field("player", &self.player).finish_non_exhaustive()
    }
}

impl Persistence {
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>, player: PlayerId) -> Self {
        Self { store, player }
    }

    /// Bind to whichever player the store says is selected.
    #[must_use]
    pub fn for_selected_player(store: Box<dyn KeyValueStore>) -> Self {
        let player = PlayerId::from_store(store.as_ref());
        Self { store, player }
    }

    /// Persistence backed by a fresh [`MemoryStore`] for the guest player.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), PlayerId::guest())
    }

    #[must_use]
    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    pub fn set_player(&mut self, player: PlayerId) {
        self.player = player;
    }

    /// Discovered ids for the current player. Corrupt or missing data is an empty set.
    #[must_use]
    pub fn load_discovered(&self) -> BTreeSet<String> {
        let key = discovered_key(&self.player);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(err) => {
                tracing::warn!(%err, %key, "discovery store unreadable; starting empty");
                return BTreeSet::new();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.is_empty() => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Ok(other) => {
                tracing::warn!(%key, kind = value_kind(&other), "discovery record is not a list; starting empty");
                BTreeSet::new()
            }
            Err(err) => {
                tracing::warn!(%err, %key, "discovery record is corrupt; starting empty");
                BTreeSet::new()
            }
        }
    }

    pub fn save_discovered(&mut self, ids: &BTreeSet<String>) {
        let key = discovered_key(&self.player);
        let result = serde_json::to_string(ids)
            .map_err(StoreError::from)
            .and_then(|raw| self.store.set(&key, &raw));
        if let Err(err) = result {
            tracing::warn!(%err, %key, "failed to persist discovered hotspots");
        }
    }

    pub fn clear_discovered(&mut self) {
        let key = discovered_key(&self.player);
        if let Err(err) = self.store.remove(&key) {
            tracing::warn!(%err, %key, "failed to clear discovered hotspots");
        }
    }

    #[must_use]
    pub fn load_transform(&self) -> Option<TransformSnapshot> {
        let raw = match self.store.get(LAST_TRANSFORM_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(%err, "transform store unreadable");
                return None;
            }
        };
        match serde_json::from_str::<TransformSnapshot>(&raw) {
            Ok(snapshot) if CameraState::from(snapshot).is_finite() => Some(snapshot),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(%err, "saved transform is corrupt");
                None
            }
        }
    }

    pub fn save_transform(&mut self, snapshot: TransformSnapshot) {
        let result = serde_json::to_string(&snapshot)
            .map_err(StoreError::from)
            .and_then(|raw| self.store.set(LAST_TRANSFORM_KEY, &raw));
        if let Err(err) = result {
            tracing::warn!(%err, "failed to persist camera transform");
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
