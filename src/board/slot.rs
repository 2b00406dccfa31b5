//! Per-cell runtime state.
//!
//! ## Slot lifecycle
//!
//! ```text
//! Hidden -> Revealing -> FaceUp -> Flashing -> Concealing -> Hidden
//!                          |
//!                          +-> Vanishing -> Matched (terminal)
//! ```
//!
//! `Revealing`, `Flashing`, `Concealing` and `Vanishing` are *busy*: a
//! visual transition is in flight and the slot cannot be selected.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::deck::{self, Deck};
use super::layout::BoardLayout;
use crate::core::{CellIndex, ConfigError, PairId};

/// Where a slot is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotPhase {
    /// Face down, selectable.
    #[default]
    Hidden,
    /// Flipping face up after a click.
    Revealing,
    /// Face up, waiting for its pair to resolve.
    FaceUp,
    /// Mismatch flash in progress.
    Flashing,
    /// Flipping back face down.
    Concealing,
    /// Match confirmed, vanish effect in progress.
    Vanishing,
    /// Gone from play for good.
    Matched,
}

impl SlotPhase {
    /// Is a visual transition in flight?
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Revealing | Self::Flashing | Self::Concealing | Self::Vanishing
        )
    }

    /// Is the card showing its face (or gone after showing it)?
    #[must_use]
    pub const fn is_face_up(self) -> bool {
        matches!(
            self,
            Self::FaceUp | Self::Flashing | Self::Concealing | Self::Vanishing | Self::Matched
        )
    }

    /// Has this card been claimed by a match?
    #[must_use]
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Vanishing | Self::Matched)
    }

    /// Counts against the open-card cap: turned over and not yet resolved.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            Self::Revealing | Self::FaceUp | Self::Flashing | Self::Concealing
        )
    }
}

/// Runtime state of one playable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSlot {
    cell: CellIndex,
    pair: PairId,
    phase: SlotPhase,
}

impl CardSlot {
    /// Create a face-down slot.
    #[must_use]
    pub const fn new(cell: CellIndex, pair: PairId) -> Self {
        Self {
            cell,
            pair,
            phase: SlotPhase::Hidden,
        }
    }

    #[must_use]
    pub const fn cell(&self) -> CellIndex {
        self.cell
    }

    #[must_use]
    pub const fn pair(&self) -> PairId {
        self.pair
    }

    #[must_use]
    pub const fn phase(&self) -> SlotPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_face_up(&self) -> bool {
        self.phase.is_face_up()
    }

    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.phase.is_matched()
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub(crate) fn set_phase(&mut self, phase: SlotPhase) {
        self.phase = phase;
    }
}

/// All slots of a board, one per playable cell.
///
/// Masked cells have no slot; lookups for them return `None`.
#[derive(Clone, Debug)]
pub struct SlotTable {
    layout: BoardLayout,
    /// Row-major order.
    slots: Vec<CardSlot>,
    by_cell: FxHashMap<CellIndex, usize>,
}

impl SlotTable {
    /// Generate the deck for `seed` and deal it onto `layout`.
    pub fn build(layout: BoardLayout, seed: u64, catalog_size: u32) -> Result<Self, ConfigError> {
        check_catalog(&layout, catalog_size)?;
        let deck = deck::generate(layout.playable_cells(), seed)?;
        Self::assign(layout, &deck, catalog_size)
    }

    /// Deal `deck` onto the playable cells of `layout` in row-major order.
    pub fn assign(layout: BoardLayout, deck: &Deck, catalog_size: u32) -> Result<Self, ConfigError> {
        check_catalog(&layout, catalog_size)?;

        if deck.len() != layout.playable_cells() as usize {
            return Err(ConfigError::DeckSizeMismatch {
                deck: deck.len(),
                playable: layout.playable_cells(),
            });
        }

        let slots: Vec<CardSlot> = layout
            .playable()
            .zip(deck.iter().copied())
            .map(|(cell, pair)| CardSlot::new(cell, pair))
            .collect();

        let by_cell = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.cell(), i))
            .collect();

        tracing::debug!(
            rows = layout.rows(),
            cols = layout.cols(),
            playable = layout.playable_cells(),
            "dealt board"
        );

        Ok(Self {
            layout,
            slots,
            by_cell,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot at `cell`, if it is playable.
    #[must_use]
    pub fn get(&self, cell: CellIndex) -> Option<&CardSlot> {
        self.by_cell.get(&cell).map(|&i| &self.slots[i])
    }

    pub(crate) fn get_mut(&mut self, cell: CellIndex) -> Option<&mut CardSlot> {
        self.by_cell.get(&cell).map(|&i| &mut self.slots[i])
    }

    /// Slots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &CardSlot> {
        self.slots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CardSlot> {
        self.slots.iter_mut()
    }

    /// Number of slots counting against the open-card cap.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.phase().is_open()).count()
    }

    /// Has every slot reached the terminal `Matched` phase?
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.phase() == SlotPhase::Matched)
    }
}

fn check_catalog(layout: &BoardLayout, catalog_size: u32) -> Result<(), ConfigError> {
    if catalog_size < layout.pair_count() {
        return Err(ConfigError::InsufficientCatalog {
            needed: layout.pair_count(),
            available: catalog_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rows: u32, cols: u32, empty: &[u32]) -> BoardLayout {
        BoardLayout::new(rows, cols, empty.iter().copied().map(CellIndex::new)).unwrap()
    }

    #[test]
    fn test_phase_flags() {
        assert!(!SlotPhase::Hidden.is_busy());
        assert!(!SlotPhase::Hidden.is_open());
        assert!(SlotPhase::Revealing.is_busy());
        assert!(SlotPhase::Revealing.is_open());
        assert!(!SlotPhase::Revealing.is_face_up());
        assert!(SlotPhase::FaceUp.is_open());
        assert!(!SlotPhase::FaceUp.is_busy());
        assert!(SlotPhase::Vanishing.is_matched());
        assert!(!SlotPhase::Vanishing.is_open());
        assert!(SlotPhase::Matched.is_matched());
        assert!(!SlotPhase::Matched.is_busy());
    }

    #[test]
    fn test_assign_skips_masked_cells() {
        let deck = vec![PairId::new(1), PairId::new(0), PairId::new(0), PairId::new(1)];
        let table = SlotTable::assign(layout(2, 3, &[1, 4]), &deck, 2).unwrap();

        assert_eq!(table.len(), 4);
        assert!(table.get(CellIndex::new(1)).is_none());
        assert!(table.get(CellIndex::new(4)).is_none());
        assert_eq!(table.get(CellIndex::new(0)).unwrap().pair(), PairId::new(1));
        assert_eq!(table.get(CellIndex::new(2)).unwrap().pair(), PairId::new(0));
        assert_eq!(table.get(CellIndex::new(3)).unwrap().pair(), PairId::new(0));
        assert_eq!(table.get(CellIndex::new(5)).unwrap().pair(), PairId::new(1));
        assert!(table.iter().all(|slot| slot.phase() == SlotPhase::Hidden));
    }

    #[test]
    fn test_build_matches_generated_deck() {
        let table = SlotTable::build(layout(2, 2, &[]), 1, 2).unwrap();
        let dealt: Vec<PairId> = table.iter().map(CardSlot::pair).collect();
        assert_eq!(dealt, deck::generate(4, 1).unwrap());
    }

    #[test]
    fn test_insufficient_catalog() {
        let err = SlotTable::build(layout(4, 4, &[]), 1, 7).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InsufficientCatalog {
                needed: 8,
                available: 7
            }
        );
    }

    #[test]
    fn test_deck_size_mismatch() {
        let deck = vec![PairId::new(0), PairId::new(0)];
        let err = SlotTable::assign(layout(2, 2, &[]), &deck, 4).unwrap_err();
        assert!(matches!(err, ConfigError::DeckSizeMismatch { deck: 2, playable: 4 }));
    }

    #[test]
    fn test_open_count_and_all_matched() {
        let mut table = SlotTable::build(layout(2, 2, &[]), 3, 2).unwrap();
        assert_eq!(table.open_count(), 0);
        assert!(!table.all_matched());

        table.get_mut(CellIndex::new(0)).unwrap().set_phase(SlotPhase::Revealing);
        table.get_mut(CellIndex::new(1)).unwrap().set_phase(SlotPhase::FaceUp);
        assert_eq!(table.open_count(), 2);

        for slot in table.iter_mut() {
            slot.set_phase(SlotPhase::Matched);
        }
        assert!(table.all_matched());
    }
}
