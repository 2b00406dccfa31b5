//! Session and save state.
//!
//! - `state`: `SessionState`, the durable progress of one game
//! - `save`: the save slot (`SaveRecord`, `SaveStore` and its backends)
//! - `context`: `SessionContext`, the one-shot hand-off from the menu flow

pub mod state;
pub mod save;
pub mod context;

pub use state::SessionState;
pub use save::{
    persist, try_load, JsonFileStore, MemoryStore, SaveRecord, SaveStore, SAVE_FILE_NAME,
    SAVE_VERSION,
};
pub use context::{generate_seed, NewGame, SessionContext, StartMode};
