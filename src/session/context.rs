//! Hand-off from the menu flow to the engine.
//!
//! A `SessionContext` is created by the "new game" or "continue" action,
//! consumed once when the board is built, and then dropped.

use std::time::{SystemTime, UNIX_EPOCH};

use super::save::{try_load, SaveStore};
use super::state::SessionState;
use crate::board::BoardLayout;
use crate::core::{ConfigError, DifficultyEntry, DifficultyId};

/// Everything needed to deal a fresh board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGame {
    pub difficulty: DifficultyId,
    pub layout: BoardLayout,
    pub seed: u64,
}

impl NewGame {
    /// New game on the board described by `entry`.
    pub fn from_entry(entry: &DifficultyEntry, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            difficulty: entry.id,
            layout: entry.layout()?,
            seed,
        })
    }
}

/// How the session should start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartMode {
    /// Deal a fresh board, replacing any existing save.
    NewGame(NewGame),
    /// Resume the saved game, or start `fallback` if there is none.
    Continue { fallback: NewGame },
}

/// One-shot session hand-off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    mode: StartMode,
}

impl SessionContext {
    /// Start a fresh game.
    #[must_use]
    pub fn new_game(game: NewGame) -> Self {
        Self {
            mode: StartMode::NewGame(game),
        }
    }

    /// Resume the saved game, falling back to `fallback`.
    #[must_use]
    pub fn continue_or(fallback: NewGame) -> Self {
        Self {
            mode: StartMode::Continue { fallback },
        }
    }

    /// Resolve into the state to play. `store` is only read.
    ///
    /// Nothing is written here: the existing save must survive until the
    /// board for the new state has been built. The engine driver saves
    /// right after that.
    pub fn into_session(self, store: &dyn SaveStore) -> SessionState {
        let game = match self.mode {
            StartMode::NewGame(game) => game,
            StartMode::Continue { fallback } => match try_load(store) {
                Some(state) => {
                    tracing::debug!(
                        seed = state.seed(),
                        attempts = state.attempts(),
                        matches = state.matches(),
                        "resuming saved game"
                    );
                    return state;
                }
                None => {
                    tracing::debug!("no usable save, starting fallback game");
                    fallback
                }
            },
        };

        SessionState::new(game.difficulty, game.layout, game.seed)
    }
}

/// Seed for a new game, derived from the wall clock.
///
/// Always fits in a non-negative `i32` so saves stay readable by tools that
/// treat the seed as a plain int.
#[must_use]
pub fn generate_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    (nanos % i32::MAX as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::save::MemoryStore;

    fn game(seed: u64) -> NewGame {
        NewGame {
            difficulty: DifficultyId::Easy,
            layout: BoardLayout::new(2, 2, []).unwrap(),
            seed,
        }
    }

    #[test]
    fn test_new_game_leaves_store_alone() {
        let store = MemoryStore::new();
        let state = SessionContext::new_game(game(11)).into_session(&store);

        assert_eq!(state.seed(), 11);
        assert!(!store.has_save());
    }

    #[test]
    fn test_new_game_ignores_existing_save() {
        let store = MemoryStore::new();
        let saved = SessionState::new(DifficultyId::Easy, BoardLayout::new(2, 2, []).unwrap(), 1);
        store.save(&saved.to_record()).unwrap();

        let state = SessionContext::new_game(game(2)).into_session(&store);

        assert_eq!(state.seed(), 2);
        assert_eq!(store.load().unwrap(), Some(saved.to_record()));
    }

    #[test]
    fn test_continue_resumes_save() {
        let store = MemoryStore::new();
        let mut saved = SessionState::new(DifficultyId::Medium, BoardLayout::new(2, 3, []).unwrap(), 5);
        saved.record_attempt();
        store.save(&saved.to_record()).unwrap();

        let state = SessionContext::continue_or(game(99)).into_session(&store);
        assert_eq!(state, saved);
    }

    #[test]
    fn test_continue_without_save_uses_fallback() {
        let store = MemoryStore::new();
        let state = SessionContext::continue_or(game(42)).into_session(&store);

        assert_eq!(state.seed(), 42);
        assert_eq!(state.attempts(), 0);
        assert!(!store.has_save());
    }

    #[test]
    fn test_continue_with_corrupt_save_uses_fallback() {
        let store = MemoryStore::new();
        store.write("garbage").unwrap();

        let state = SessionContext::continue_or(game(3)).into_session(&store);
        assert_eq!(state.seed(), 3);
    }

    #[test]
    fn test_generate_seed_range() {
        assert!(generate_seed() < i32::MAX as u64);
    }
}
