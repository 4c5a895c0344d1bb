use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oq_core::{HeroGameState, NodeId};

use crate::error::{PersistError, PersistResult};
use crate::record::{RecordHeader, SavedProgress};
use crate::store::{KeyValueStore, SharedStore};

/// Prefix shared by every save key.
pub const STORAGE_KEY_PREFIX: &str = "oathquest_game_";

/// Which mini-game a save belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// The hero RPG.
    #[default]
    Hero,
    /// The companion-pet game.
    Pet,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hero => write!(f, "hero"),
            Self::Pet => write!(f, "pet"),
        }
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(Self::Hero),
            "pet" => Ok(Self::Pet),
            other => Err(format!("unknown game kind: {other}")),
        }
    }
}

/// Header of an existing save, readable whatever its version.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveInfo {
    /// Raw `lastSaved` value, if present.
    pub last_saved: Option<String>,
    /// Raw `version` value.
    pub version: String,
}

/// One entry of a store-wide save listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveSummary {
    /// Storage key.
    pub key: String,
    /// Owning oath.
    pub oath_id: String,
    /// Game kind.
    pub kind: GameKind,
    /// When the record was written, if it is a current-version record.
    pub last_saved: Option<DateTime<Utc>>,
    /// Hero level, if it is a current-version record.
    pub hero_level: Option<u32>,
}

/// Save gateway for one oath and game kind.
///
/// Every save is a full overwrite of the single record under
/// `oathquest_game_{oath_id}_{kind}`.
#[derive(Debug, Clone)]
pub struct GamePersistence {
    store: SharedStore,
    oath_id: String,
    kind: GameKind,
    key: String,
}

impl GamePersistence {
    /// A gateway for `oath_id` and `kind` over `store`.
    pub fn new(store: SharedStore, oath_id: impl Into<String>, kind: GameKind) -> Self {
        let oath_id = oath_id.into();
        let key = format!("{STORAGE_KEY_PREFIX}{oath_id}_{kind}");
        Self {
            store,
            oath_id,
            kind,
            key,
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The owning oath.
    pub fn oath_id(&self) -> &str {
        &self.oath_id
    }

    /// The game kind.
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Persist the derived subset of `state`, replacing any previous record.
    pub fn save(&self, state: &HeroGameState, areas_explored: &[NodeId]) -> PersistResult<()> {
        let progress = SavedProgress::capture(state, areas_explored.to_vec(), Utc::now());
        self.save_progress(&progress)
    }

    /// Persist an already captured record.
    pub fn save_progress(&self, progress: &SavedProgress) -> PersistResult<()> {
        self.store.set(&self.key, &progress.to_json()?)?;
        tracing::debug!(key = %self.key, level = progress.hero_level, "saved progress");
        Ok(())
    }

    /// Load the record, surfacing why it could not be read.
    pub fn try_load(&self) -> PersistResult<Option<SavedProgress>> {
        match self.store.get(&self.key)? {
            Some(payload) => SavedProgress::from_json(&payload).map(Some),
            None => Ok(None),
        }
    }

    /// Load the record. Absent, unreadable, and version-mismatched records
    /// all load as `None`.
    pub fn load(&self) -> Option<SavedProgress> {
        match self.try_load() {
            Ok(progress) => progress,
            Err(e @ PersistError::VersionMismatch { .. }) => {
                tracing::warn!(key = %self.key, "discarding save: {e}");
                None
            }
            Err(e) => {
                tracing::error!(key = %self.key, "failed to load save: {e}");
                None
            }
        }
    }

    /// Whether a record exists under this gateway's key.
    pub fn has_save(&self) -> bool {
        match self.store.get(&self.key) {
            Ok(payload) => payload.is_some(),
            Err(e) => {
                tracing::error!(key = %self.key, "failed to check save: {e}");
                false
            }
        }
    }

    /// Remove the record.
    pub fn delete(&self) -> PersistResult<()> {
        self.store.remove(&self.key)?;
        tracing::info!(key = %self.key, "deleted save");
        Ok(())
    }

    /// Header of the stored record, even if it has an old version.
    pub fn save_info(&self) -> Option<SaveInfo> {
        let payload = self.store.get(&self.key).ok().flatten()?;
        let header: RecordHeader = serde_json::from_str(&payload).ok()?;
        Some(SaveInfo {
            last_saved: header.last_saved.map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            version: header.version.to_string(),
        })
    }

    /// The stored payload verbatim, for transfer to another device.
    pub fn export_data(&self) -> PersistResult<Option<String>> {
        self.store.get(&self.key)
    }

    /// Replace the record with `payload` after validating it. Malformed and
    /// version-mismatched payloads are rejected and the existing record is
    /// kept.
    pub fn import_data(&self, payload: &str) -> PersistResult<SavedProgress> {
        let progress = SavedProgress::from_json(payload)?;
        self.store.set(&self.key, payload)?;
        tracing::info!(key = %self.key, level = progress.hero_level, "imported save");
        Ok(progress)
    }
}

/// Every save key in `store`, sorted.
pub fn all_save_keys(store: &dyn KeyValueStore) -> PersistResult<Vec<String>> {
    Ok(store
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(STORAGE_KEY_PREFIX))
        .collect())
}

/// Describe the save under `key`. `None` if the key is absent or is not a
/// save key. Oath ids may themselves contain underscores; the game kind is
/// the last segment.
pub fn save_summary(store: &dyn KeyValueStore, key: &str) -> Option<SaveSummary> {
    let rest = key.strip_prefix(STORAGE_KEY_PREFIX)?;
    let (oath_id, kind) = rest.rsplit_once('_')?;
    let kind = kind.parse().ok()?;
    let payload = store.get(key).ok().flatten()?;
    let progress = SavedProgress::from_json(&payload).ok();
    Some(SaveSummary {
        key: key.to_string(),
        oath_id: oath_id.to_string(),
        kind,
        last_saved: progress.as_ref().map(|p| p.last_saved),
        hero_level: progress.as_ref().map(|p| p.hero_level),
    })
}

/// Remove every save in `store`. Returns how many were removed.
pub fn delete_all_saves(store: &dyn KeyValueStore) -> PersistResult<usize> {
    let keys = all_save_keys(store)?;
    for key in &keys {
        store.remove(key)?;
    }
    tracing::info!(count = keys.len(), "deleted all saves");
    Ok(keys.len())
}
