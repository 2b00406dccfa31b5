//! Deterministic deck generation.
//!
//! A deck is the multiset `{0, 0, 1, 1, .., n-1, n-1}` shuffled by a
//! [`GameRng`] seeded with the game seed. The output for a given
//! `(playable_cells, seed)` must never change: saved games rebuild their
//! board from it.

use crate::core::{ConfigError, GameRng, PairId};

/// One pair id per playable cell, in row-major cell order.
pub type Deck = Vec<PairId>;

/// Generate the shuffled deck for `playable_cells` cards.
///
/// Fails if `playable_cells` is zero or odd.
pub fn generate(playable_cells: u32, seed: u64) -> Result<Deck, ConfigError> {
    if playable_cells == 0 || playable_cells % 2 != 0 {
        return Err(ConfigError::UnpairablePlayableCells {
            playable: playable_cells,
        });
    }

    let mut deck: Deck = (0..playable_cells / 2)
        .flat_map(|id| [PairId::new(id), PairId::new(id)])
        .collect();

    GameRng::new(seed).shuffle(&mut deck);
    Ok(deck)
}
