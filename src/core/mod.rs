//! Core engine types: identifiers, RNG, errors, configuration.
//!
//! This module contains the building blocks shared by the board, session
//! and engine layers. Nothing here knows about async or persistence.

pub mod ids;
pub mod rng;
pub mod error;
pub mod config;

pub use ids::{CellIndex, PairId};
pub use rng::GameRng;
pub use error::{ConfigError, PersistenceError};
pub use config::{DifficultyDatabase, DifficultyEntry, DifficultyId, EngineConfig, DEFAULT_OPEN_CAP};
