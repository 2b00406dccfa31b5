//! # rust-pairs
//!
//! Board/session engine for memory pair-matching card games.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: A board is fully described by its layout and seed.
//!    Saves store only those plus progress and rebuild the same deal.
//!
//! 2. **Presentation-Agnostic**: The engine never renders. It asks an
//!    [`Effects`] implementation to animate a card and awaits the result.
//!
//! 3. **Serialized Resolution**: Cards may be turned over concurrently (up
//!    to a configurable cap), but pairs are adjudicated one at a time in
//!    the order they formed.
//!
//! ## Modules
//!
//! - `core`: Identifiers, RNG, errors, configuration
//! - `board`: Layout, deck generation, card slots
//! - `session`: Durable progress, the save slot, the start hand-off
//! - `engine`: Pair resolution state machine and its async driver
//!
//! ## Example
//!
//! ```
//! use rust_pairs::board::BoardLayout;
//! use rust_pairs::core::{DifficultyId, EngineConfig};
//! use rust_pairs::engine::{MatchEngine, SelectOutcome};
//! use rust_pairs::session::SessionState;
//! use rust_pairs::CellIndex;
//!
//! let layout = BoardLayout::new(2, 2, []).unwrap();
//! let session = SessionState::new(DifficultyId::Easy, layout, 1);
//! let mut engine = MatchEngine::new(session, 2, &EngineConfig::default()).unwrap();
//!
//! assert_eq!(engine.select(CellIndex::new(0)), SelectOutcome::Accepted);
//! ```

pub mod core;
pub mod board;
pub mod session;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    CellIndex, PairId, GameRng,
    ConfigError, PersistenceError,
    EngineConfig, DifficultyId, DifficultyEntry, DifficultyDatabase,
};

pub use crate::board::{BoardLayout, CardSlot, SlotPhase, SlotTable};

pub use crate::session::{
    SessionState, SessionContext, NewGame, StartMode,
    SaveRecord, SaveStore, JsonFileStore, MemoryStore,
};

pub use crate::engine::{
    MatchEngine, EnginePhase, SelectOutcome, IgnoreReason, PendingPair,
    BoardSnapshot, Effects, EngineEvent, EngineEvents, EngineHandle,
};
