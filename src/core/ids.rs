//! Opaque identifiers for board cells and card faces.

use serde::{Deserialize, Serialize};

/// Position of a cell in the board grid, counted in row-major order.
///
/// Masked cells have an index too; they just never get a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellIndex(pub u32);

impl CellIndex {
    /// Create a new cell index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CellIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({})", self.0)
    }
}

/// Identifier shared by the two cards of a pair.
///
/// Doubles as the index into the face catalog supplied by the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(pub u32);

impl PairId {
    /// Create a new pair ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pair({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index() {
        let cell = CellIndex::new(5);
        assert_eq!(cell.raw(), 5);
        assert_eq!(format!("{}", cell), "Cell(5)");
    }

    #[test]
    fn test_pair_id() {
        let id = PairId::new(3);
        assert_eq!(id.raw(), 3);
        assert_eq!(format!("{}", id), "Pair(3)");
    }

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&CellIndex::new(7)).unwrap(), "7");
        let pair: PairId = serde_json::from_str("2").unwrap();
        assert_eq!(pair, PairId::new(2));
    }
}
