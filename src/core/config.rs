//! Engine and difficulty configuration.
//!
//! - `EngineConfig`: timings and the open-card cap the engine runs with
//! - `DifficultyEntry`: one selectable board (geometry, face catalog, timings)
//! - `DifficultyDatabase`: the table of entries, loadable from TOML
//!
//! The engine never hardcodes a board; the menu collaborator picks an entry
//! and hands its layout and config to the session.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::ids::CellIndex;
use crate::board::BoardLayout;

/// Default number of face-up, unresolved cards allowed at once.
pub const DEFAULT_OPEN_CAP: usize = 4;

/// Runtime parameters for the pair resolution engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum face-up cards that are not yet resolved. Never below 2.
    pub open_cap: usize,

    /// Reveal-all phase before play. Zero disables it.
    pub preview: Duration,

    /// Length of the mismatch flash.
    pub mismatch_flash: Duration,

    /// Length of the match vanish effect.
    pub match_vanish: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            open_cap: DEFAULT_OPEN_CAP,
            preview: Duration::ZERO,
            mismatch_flash: Duration::from_millis(500),
            match_vanish: Duration::from_millis(250),
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the open-card cap (clamped to at least 2, one full pair).
    #[must_use]
    pub fn with_open_cap(mut self, cap: usize) -> Self {
        self.open_cap = cap.max(2);
        self
    }

    /// Set the preview duration.
    #[must_use]
    pub fn with_preview(mut self, preview: Duration) -> Self {
        self.preview = preview;
        self
    }

    /// Set the mismatch flash duration.
    #[must_use]
    pub fn with_mismatch_flash(mut self, flash: Duration) -> Self {
        self.mismatch_flash = flash;
        self
    }

    /// Set the match vanish duration.
    #[must_use]
    pub fn with_match_vanish(mut self, vanish: Duration) -> Self {
        self.match_vanish = vanish;
        self
    }

    /// Whether a fresh game starts with the reveal-all preview.
    #[must_use]
    pub fn has_preview(&self) -> bool {
        !self.preview.is_zero()
    }
}

/// Selectable difficulty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyId {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for DifficultyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DifficultyId::Easy => "easy",
            DifficultyId::Medium => "medium",
            DifficultyId::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// One row of the difficulty table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyEntry {
    pub id: DifficultyId,
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub empty_indices: Vec<u32>,

    /// Number of distinct faces the UI can draw.
    pub catalog_size: u32,

    #[serde(default)]
    pub preview_seconds: f32,
    #[serde(default = "default_vanish_seconds")]
    pub match_vanish_seconds: f32,
    #[serde(default = "default_flash_seconds")]
    pub mismatch_flash_seconds: f32,
}

fn default_vanish_seconds() -> f32 {
    0.25
}

fn default_flash_seconds() -> f32 {
    0.5
}

/// Negative or non-finite seconds collapse to zero.
fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or_default()
}

impl DifficultyEntry {
    /// Validate and build the board layout for this entry.
    pub fn layout(&self) -> Result<BoardLayout, ConfigError> {
        BoardLayout::new(
            self.rows,
            self.cols,
            self.empty_indices.iter().copied().map(CellIndex::new),
        )
    }

    /// Engine configuration carrying this entry's timings.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_preview(seconds(self.preview_seconds))
            .with_match_vanish(seconds(self.match_vanish_seconds))
            .with_mismatch_flash(seconds(self.mismatch_flash_seconds))
    }
}

/// Table of difficulty entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyDatabase {
    pub difficulties: Vec<DifficultyEntry>,
}

impl Default for DifficultyDatabase {
    fn default() -> Self {
        let entry = |id, rows, cols, empty_indices: Vec<u32>, preview_seconds| DifficultyEntry {
            id,
            rows,
            cols,
            empty_indices,
            catalog_size: 16,
            preview_seconds,
            match_vanish_seconds: default_vanish_seconds(),
            mismatch_flash_seconds: default_flash_seconds(),
        };

        Self {
            difficulties: vec![
                entry(DifficultyId::Easy, 2, 2, vec![], 1.0),
                entry(DifficultyId::Medium, 4, 4, vec![], 1.5),
                entry(DifficultyId::Hard, 5, 6, vec![14, 15], 2.0),
            ],
        }
    }
}

impl DifficultyDatabase {
    /// Parse a table from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::MalformedTable(err.to_string()))
    }

    /// Read a table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            ConfigError::MalformedTable(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Look up an entry by id.
    pub fn get(&self, id: DifficultyId) -> Result<&DifficultyEntry, ConfigError> {
        self.difficulties
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| ConfigError::UnknownDifficulty(id.to_string()))
    }

    /// Iterate over all entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &DifficultyEntry> {
        self.difficulties.iter()
    }
}
