//! Static board geometry.

use crate::core::{CellIndex, ConfigError};

/// Grid geometry plus the cells that are permanently masked out of play.
///
/// Construction validates the pairing invariant, so every `BoardLayout`
/// has a positive, even number of playable cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    rows: u32,
    cols: u32,
    /// Sorted, deduplicated.
    empty_cells: Vec<CellIndex>,
}

impl BoardLayout {
    /// Validate and create a layout.
    ///
    /// Duplicate empty indices count once.
    pub fn new(
        rows: u32,
        cols: u32,
        empty_cells: impl IntoIterator<Item = CellIndex>,
    ) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidDimensions { rows, cols });
        }

        let total = rows
            .checked_mul(cols)
            .ok_or(ConfigError::InvalidDimensions { rows, cols })?;

        let mut empty_cells: Vec<CellIndex> = empty_cells.into_iter().collect();
        empty_cells.sort_unstable();
        empty_cells.dedup();

        if let Some(&cell) = empty_cells.iter().find(|cell| cell.raw() >= total) {
            return Err(ConfigError::EmptyCellOutOfRange { cell, total });
        }

        // Deduplicated and in range, so this cannot underflow.
        let playable = total - empty_cells.len() as u32;
        if playable == 0 || playable % 2 != 0 {
            return Err(ConfigError::UnpairablePlayableCells { playable });
        }

        Ok(Self {
            rows,
            cols,
            empty_cells,
        })
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Masked cells in ascending order.
    #[must_use]
    pub fn empty_cells(&self) -> &[CellIndex] {
        &self.empty_cells
    }

    #[must_use]
    pub fn total_cells(&self) -> u32 {
        self.rows * self.cols
    }

    #[must_use]
    pub fn playable_cells(&self) -> u32 {
        self.total_cells() - self.empty_cells.len() as u32
    }

    #[must_use]
    pub fn pair_count(&self) -> u32 {
        self.playable_cells() / 2
    }

    /// Is `cell` inside the grid?
    #[must_use]
    pub fn contains(&self, cell: CellIndex) -> bool {
        cell.raw() < self.total_cells()
    }

    /// Is `cell` a masked (non-playable) position?
    #[must_use]
    pub fn is_masked(&self, cell: CellIndex) -> bool {
        self.empty_cells.binary_search(&cell).is_ok()
    }

    /// Is `cell` inside the grid and not masked?
    #[must_use]
    pub fn is_playable(&self, cell: CellIndex) -> bool {
        self.contains(cell) && !self.is_masked(cell)
    }

    /// Playable cells in row-major order.
    pub fn playable(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (0..self.total_cells())
            .map(CellIndex::new)
            .filter(move |&cell| !self.is_masked(cell))
    }
}
