//! The persisted save slot.
//!
//! One slot, overwritten on every progress change. The on-disk form is
//! pretty-printed JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "difficulty": "easy",
//!   "rows": 2,
//!   "cols": 2,
//!   "emptyIndices": [],
//!   "seed": 1,
//!   "attempts": 3,
//!   "matches": 1,
//!   "previewDone": true,
//!   "matchedCellIndices": [0, 3],
//!   "completed": false
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::state::SessionState;
use crate::core::{DifficultyId, PersistenceError};

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// File name used by [`JsonFileStore::in_dir`].
pub const SAVE_FILE_NAME: &str = "save.json";

/// Serialized form of a [`SessionState`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub version: u32,
    pub difficulty: DifficultyId,
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub empty_indices: Vec<u32>,
    pub seed: u64,
    pub attempts: u32,
    pub matches: u32,
    pub preview_done: bool,
    #[serde(default)]
    pub matched_cell_indices: Vec<u32>,
    pub completed: bool,
}

impl SaveRecord {
    /// Encode as pretty JSON.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON, rejecting other format versions.
    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        let record: SaveRecord = serde_json::from_str(text)?;
        if record.version != SAVE_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: record.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(record)
    }
}

/// Backing storage for the save slot.
///
/// Implementors move raw text; encoding and validation live in the
/// provided methods.
pub trait SaveStore: Send + Sync {
    /// Read the raw slot contents. `Ok(None)` when no save exists.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Overwrite the slot.
    fn write(&self, contents: &str) -> Result<(), PersistenceError>;

    /// Remove the slot. Removing a missing save is not an error.
    fn delete(&self) -> Result<(), PersistenceError>;

    /// Does a save exist (regardless of whether it parses)?
    fn has_save(&self) -> bool {
        matches!(self.read(), Ok(Some(_)))
    }

    /// Load and decode the record. Empty contents count as no save.
    fn load(&self) -> Result<Option<SaveRecord>, PersistenceError> {
        match self.read()? {
            Some(text) if !text.trim().is_empty() => SaveRecord::from_json(&text).map(Some),
            _ => Ok(None),
        }
    }

    /// Encode and write the record.
    fn save(&self, record: &SaveRecord) -> Result<(), PersistenceError> {
        self.write(&record.to_json()?)
    }
}

/// Load a resumable session, treating every failure as "no save".
///
/// Corrupt or invalid saves are logged and skipped, never fatal.
pub fn try_load(store: &dyn SaveStore) -> Option<SessionState> {
    let record = match store.load() {
        Ok(record) => record?,
        Err(err) => {
            tracing::warn!(%err, "ignoring unreadable save");
            return None;
        }
    };

    match SessionState::from_record(record) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(%err, "ignoring invalid save");
            None
        }
    }
}

/// Write `state`, logging instead of failing.
///
/// Play continues in memory when the slot cannot be written; only resume
/// progress is at risk.
pub fn persist(store: &dyn SaveStore, state: &SessionState) {
    if let Err(err) = store.save(&state.to_record()) {
        tracing::error!(%err, "failed to write save, continuing in memory");
    }
}

/// Save slot stored as a JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store the save at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the save as [`SAVE_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SAVE_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for JsonFileStore {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, contents: &str) -> Result<(), PersistenceError> {
        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn delete(&self) -> Result<(), PersistenceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory save slot. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slot contents, for inspection.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), PersistenceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.to_owned());
        Ok(())
    }

    fn delete(&self) -> Result<(), PersistenceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
