//! Durable progress of one game.

use im::OrdSet;
use rustc_hash::FxHashMap;

use super::save::{SaveRecord, SAVE_VERSION};
use crate::board::{generate, BoardLayout};
use crate::core::{CellIndex, DifficultyId, PairId, PersistenceError};

/// Board identity plus progress; everything needed to resume a game.
///
/// `matched_cells` is the authoritative resume point. It is an `im` set so
/// snapshots for the save slot are cheap clones.
///
/// Counters only move forward, through the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    difficulty: DifficultyId,
    layout: BoardLayout,
    seed: u64,
    attempts: u32,
    matches: u32,
    preview_done: bool,
    matched_cells: OrdSet<CellIndex>,
    completed: bool,
}

impl SessionState {
    /// Fresh state for a new game.
    #[must_use]
    pub fn new(difficulty: DifficultyId, layout: BoardLayout, seed: u64) -> Self {
        Self {
            difficulty,
            layout,
            seed,
            attempts: 0,
            matches: 0,
            preview_done: false,
            matched_cells: OrdSet::new(),
            completed: false,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyId {
        self.difficulty
    }

    #[must_use]
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn matches(&self) -> u32 {
        self.matches
    }

    #[must_use]
    pub fn preview_done(&self) -> bool {
        self.preview_done
    }

    #[must_use]
    pub fn matched_cells(&self) -> &OrdSet<CellIndex> {
        &self.matched_cells
    }

    #[must_use]
    pub fn is_matched(&self, cell: CellIndex) -> bool {
        self.matched_cells.contains(&cell)
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    pub(crate) fn record_match(&mut self, first: CellIndex, second: CellIndex) {
        self.matches += 1;
        self.matched_cells.insert(first);
        self.matched_cells.insert(second);
    }

    pub(crate) fn mark_preview_done(&mut self) {
        self.preview_done = true;
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// Serialized form for the save slot.
    #[must_use]
    pub fn to_record(&self) -> SaveRecord {
        SaveRecord {
            version: SAVE_VERSION,
            difficulty: self.difficulty,
            rows: self.layout.rows(),
            cols: self.layout.cols(),
            empty_indices: self.layout.empty_cells().iter().map(|c| c.raw()).collect(),
            seed: self.seed,
            attempts: self.attempts,
            matches: self.matches,
            preview_done: self.preview_done,
            matched_cell_indices: self.matched_cells.iter().map(|c| c.raw()).collect(),
            completed: self.completed,
        }
    }

    /// Rebuild state from a save record.
    ///
    /// The layout is revalidated and the deck is dealt again to check the
    /// matched cells: each must be playable, each must come with its
    /// partner, and there must be exactly two per recorded match.
    /// Counters must satisfy `attempts >= matches`.
    pub fn from_record(record: SaveRecord) -> Result<Self, PersistenceError> {
        let layout = BoardLayout::new(
            record.rows,
            record.cols,
            record.empty_indices.iter().copied().map(CellIndex::new),
        )?;

        if record.matches > layout.pair_count() || record.attempts < record.matches {
            return Err(PersistenceError::InconsistentCounters {
                attempts: record.attempts,
                matches: record.matches,
            });
        }

        let matched_cells: OrdSet<CellIndex> = record
            .matched_cell_indices
            .iter()
            .copied()
            .map(CellIndex::new)
            .collect();

        if matched_cells.len() != record.matches as usize * 2 {
            return Err(PersistenceError::MatchedCellCount {
                matches: record.matches,
                cells: matched_cells.len(),
            });
        }

        let dealt: FxHashMap<CellIndex, PairId> = layout
            .playable()
            .zip(generate(layout.playable_cells(), record.seed)?)
            .collect();

        // Pair id -> the one matched cell seen so far.
        let mut unpaired: FxHashMap<PairId, CellIndex> = FxHashMap::default();
        for &cell in &matched_cells {
            let Some(&pair) = dealt.get(&cell) else {
                return Err(PersistenceError::StrayMatchedCell { cell });
            };
            if unpaired.remove(&pair).is_none() {
                unpaired.insert(pair, cell);
            }
        }

        if let Some(&cell) = unpaired.values().min() {
            return Err(PersistenceError::UnpairedMatch { cell });
        }

        Ok(Self {
            difficulty: record.difficulty,
            layout,
            seed: record.seed,
            attempts: record.attempts,
            matches: record.matches,
            preview_done: record.preview_done,
            matched_cells,
            completed: record.completed,
        })
    }
}
