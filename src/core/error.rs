//! Error taxonomy.
//!
//! - [`ConfigError`]: the board cannot be built. Reported once, never retried.
//! - [`PersistenceError`]: the save slot could not be read or written.
//!   Callers recover locally (no save / keep playing in memory).
//!
//! Clicks that violate the selection rules are not errors at all; see
//! [`SelectOutcome`](crate::engine::SelectOutcome).

use thiserror::Error;

use super::ids::CellIndex;

/// The board or its configuration is unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("empty cell {cell} lies outside a board of {total} cells")]
    EmptyCellOutOfRange { cell: CellIndex, total: u32 },

    #[error("playable cell count must be positive and even, got {playable}")]
    UnpairablePlayableCells { playable: u32 },

    #[error("face catalog too small: need {needed} faces, have {available}")]
    InsufficientCatalog { needed: u32, available: u32 },

    #[error("deck does not fit the layout: {deck} values for {playable} playable cells")]
    DeckSizeMismatch { deck: usize, playable: u32 },

    #[error("no difficulty entry named {0}")]
    UnknownDifficulty(String),

    #[error("malformed difficulty table: {0}")]
    MalformedTable(String),
}

/// Reading or writing the save slot failed.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("save counters are inconsistent: {attempts} attempts, {matches} matches")]
    InconsistentCounters { attempts: u32, matches: u32 },

    #[error("saved match {cell} is not a playable cell")]
    StrayMatchedCell { cell: CellIndex },

    #[error("save records {matches} matches but {cells} matched cells")]
    MatchedCellCount { matches: u32, cells: usize },

    #[error("saved match {cell} is missing its partner")]
    UnpairedMatch { cell: CellIndex },

    #[error("saved board is invalid: {0}")]
    InvalidBoard(#[from] ConfigError),
}
