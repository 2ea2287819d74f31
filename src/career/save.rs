//! Player save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current envelope version. Bump it when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest version that still loads. Only bump it
//!   for breaking changes (a field removed or its meaning changed); added
//!   fields fall back to `PlayerStats::default()` through `#[serde(default)]`.
//!
//! ## v2 changes
//! - `lastRoyaltyCollectedAt` added (royalties are credited per interval)
//! - additive only, so v1 saves still load

use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::state::PlayerStats;
use crate::error::{Error, Result};

pub const SAVE_VERSION: u32 = 2;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    player: PlayerStats,
}

/// Storage key for a user's record.
pub fn stats_key(uid: &str) -> String {
    format!("users/{}/stats", uid)
}

pub fn to_json(player: &PlayerStats) -> Result<String> {
    let data = SaveData {
        version: SAVE_VERSION,
        player: player.clone(),
    };
    Ok(serde_json::to_string(&data)?)
}

/// Decode a save envelope.
///
/// `Ok(None)` means the save is too old to migrate and should be replaced
/// by a fresh career.
pub fn from_json(json: &str) -> Result<Option<PlayerStats>> {
    let data: SaveData = serde_json::from_str(json)?;

    if data.version > SAVE_VERSION {
        return Err(Error::Save(format!(
            "save was written by a newer build (saved={}, current={})",
            data.version, SAVE_VERSION
        )));
    }
    if data.version < MIN_COMPATIBLE_VERSION {
        info!(
            "save version too old (saved={}, min_compatible={}); starting fresh",
            data.version, MIN_COMPATIBLE_VERSION
        );
        return Ok(None);
    }
    if data.version < SAVE_VERSION {
        info!(
            "migrating save (saved={}, current={})",
            data.version, SAVE_VERSION
        );
    }
    Ok(Some(data.player))
}

/// Key-value persistence for save envelopes.
pub trait SaveStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser `localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| Error::Save("localStorage is unavailable".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| Error::Save(format!("localStorage read failed: {e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| Error::Save(format!("localStorage write failed: {e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| Error::Save(format!("localStorage remove failed: {e:?}")))
    }
}

pub fn save_player<S: SaveStore + ?Sized>(store: &mut S, uid: &str, player: &PlayerStats) -> Result<()> {
    let json = to_json(player)?;
    store.write(&stats_key(uid), &json)
}

/// Load a user's record. Corrupt or too-old saves are discarded and reported
/// as `Ok(None)`.
pub fn load_player<S: SaveStore + ?Sized>(store: &mut S, uid: &str) -> Result<Option<PlayerStats>> {
    let key = stats_key(uid);
    let json = match store.read(&key)? {
        Some(j) => j,
        None => return Ok(None),
    };
    match from_json(&json) {
        Ok(Some(player)) => Ok(Some(player)),
        Ok(None) => {
            store.remove(&key)?;
            Ok(None)
        }
        Err(Error::Json(e)) => {
            warn!("save for {} is corrupt, discarding: {}", uid, e);
            store.remove(&key)?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub fn delete_player<S: SaveStore + ?Sized>(store: &mut S, uid: &str) -> Result<()> {
    store.remove(&stats_key(uid))
}
