//! The UI collaborator seen from the engine.
//!
//! The engine never renders anything. It asks the UI to animate a card and
//! waits for the returned future; how long that takes and what it looks
//! like is the UI's business.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::SlotPhase;
use crate::core::CellIndex;

/// Awaitable visual effects, keyed by cell.
///
/// Implementations must be cheap to call concurrently: several flips can
/// be in flight while the resolver runs a flash or vanish.
pub trait Effects: Send + Sync + 'static {
    /// Show `cell` in `phase` immediately, without animation.
    ///
    /// Called once per slot when the board is built (face up for the
    /// preview, face down, or already matched on resume).
    fn present(&self, _cell: CellIndex, _phase: SlotPhase) {}

    /// Flip `cell` to the given face; resolves when the flip is done.
    fn flip(&self, cell: CellIndex, face_up: bool) -> impl Future<Output = ()> + Send;

    /// Mismatch flash on `cell` lasting `duration`.
    fn flash(&self, cell: CellIndex, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Vanish `cell` out of play over `duration`.
    fn vanish(&self, cell: CellIndex, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Notifications from the engine to the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A pair finished resolving (after its animations).
    Settled { matched: bool, cells: [CellIndex; 2] },
    /// Every card is matched. Sent once per session.
    GameOver,
}
