//! Pair resolution engine.
//!
//! - `state`: the synchronous state machine (`MatchEngine`)
//! - `effects`: the capability interface the UI implements (`Effects`)
//!   and the events it receives (`EngineEvent`)
//! - `driver`: Tokio tasks that run a session (`EngineHandle`)

pub mod state;
pub mod effects;
pub mod driver;

pub use state::{
    Adjudication, BoardSnapshot, EnginePhase, IgnoreReason, MatchEngine, PendingPair,
    ResolutionStart, SelectOutcome,
};
pub use effects::{Effects, EngineEvent};
pub use driver::{EngineEvents, EngineHandle};
