//! Deck generation and board dealing properties.
//!
//! Saved games rebuild their board from `(layout, seed)`, so these tests
//! pin down the multiset shape, determinism, and row-major dealing.

use proptest::prelude::*;

use rust_pairs::board::{generate, BoardLayout, SlotTable};
use rust_pairs::core::{CellIndex, ConfigError, PairId};

proptest! {
    /// Every pair id appears exactly twice, for any even size and seed.
    #[test]
    fn prop_deck_is_paired_multiset(pairs in 1u32..64, seed in any::<u64>()) {
        let deck = generate(pairs * 2, seed).unwrap();
        prop_assert_eq!(deck.len(), (pairs * 2) as usize);

        let mut counts = vec![0u32; pairs as usize];
        for id in &deck {
            prop_assert!(id.raw() < pairs);
            counts[id.raw() as usize] += 1;
        }
        prop_assert!(counts.iter().all(|&c| c == 2));
    }

    /// Same inputs, same deck.
    #[test]
    fn prop_deck_is_deterministic(pairs in 1u32..64, seed in any::<u64>()) {
        prop_assert_eq!(generate(pairs * 2, seed).unwrap(), generate(pairs * 2, seed).unwrap());
    }

    /// Odd sizes are rejected.
    #[test]
    fn prop_odd_sizes_rejected(half in 0u32..64, seed in any::<u64>()) {
        let odd = half * 2 + 1;
        prop_assert_eq!(
            generate(odd, seed),
            Err(ConfigError::UnpairablePlayableCells { playable: odd })
        );
    }

    /// Layouts with an odd playable count never produce slots.
    #[test]
    fn prop_odd_layouts_rejected(r in 0u32..4, c in 0u32..4) {
        let (rows, cols) = (r * 2 + 1, c * 2 + 1);
        prop_assert_eq!(
            BoardLayout::new(rows, cols, []),
            Err(ConfigError::UnpairablePlayableCells { playable: rows * cols })
        );
    }

    /// Masked cells never receive a card.
    #[test]
    fn prop_masked_cells_get_no_slot(seed in any::<u64>(), masked in 0u32..16) {
        let mut empty = vec![CellIndex::new(masked)];
        // Keep the playable count even.
        empty.push(CellIndex::new((masked + 1) % 16));
        let layout = BoardLayout::new(4, 4, empty.clone()).unwrap();
        let table = SlotTable::build(layout, seed, 7).unwrap();

        prop_assert_eq!(table.len(), 14);
        for cell in empty {
            prop_assert!(table.get(cell).is_none());
        }
    }
}

fn ids(raw: &[u32]) -> Vec<PairId> {
    raw.iter().copied().map(PairId::new).collect()
}

/// Exact decks for known seeds. Old saves redeal from these; any change
/// in the RNG stream or the shuffle breaks every saved game.
#[test]
fn test_decks_are_pinned() {
    assert_eq!(generate(4, 1).unwrap(), ids(&[1, 0, 0, 1]));
    assert_eq!(generate(6, 6).unwrap(), ids(&[0, 1, 2, 0, 2, 1]));
    assert_eq!(
        generate(16, 42).unwrap(),
        ids(&[0, 1, 4, 3, 6, 5, 6, 7, 0, 3, 4, 2, 2, 5, 7, 1])
    );
}

/// The hard board (5x6, two masked cells) dealt from seed 42.
#[test]
fn test_hard_board_deal_is_pinned() {
    let layout = BoardLayout::new(5, 6, [CellIndex::new(14), CellIndex::new(15)]).unwrap();
    let table = SlotTable::build(layout, 42, 16).unwrap();

    let dealt: Vec<u32> = table.iter().map(|slot| slot.pair().raw()).collect();
    assert_eq!(
        dealt,
        vec![8, 1, 5, 5, 0, 0, 4, 7, 2, 4, 6, 2, 9, 3, 12, 10, 6, 11, 12, 10, 13, 8, 7, 13, 11, 1, 9, 3]
    );
    assert!(table.get(CellIndex::new(14)).is_none());
    assert_eq!(table.get(CellIndex::new(16)).unwrap().pair(), PairId::new(12));
}

/// Slots receive deck values in row-major order, skipping masked cells.
#[test]
fn test_dealing_follows_row_major_order() {
    let layout = BoardLayout::new(3, 4, [CellIndex::new(5), CellIndex::new(6)]).unwrap();
    let deck = generate(layout.playable_cells(), 77).unwrap();
    let table = SlotTable::build(layout.clone(), 77, 5).unwrap();

    let dealt: Vec<(CellIndex, PairId)> = table.iter().map(|s| (s.cell(), s.pair())).collect();
    let expected: Vec<(CellIndex, PairId)> = layout.playable().zip(deck).collect();
    assert_eq!(dealt, expected);
}

/// A catalog smaller than the pair count is a configuration error.
#[test]
fn test_catalog_too_small() {
    let layout = BoardLayout::new(2, 3, []).unwrap();
    assert_eq!(
        SlotTable::build(layout, 1, 2).unwrap_err(),
        ConfigError::InsufficientCatalog {
            needed: 3,
            available: 2
        }
    );
}
