//! Pair resolution state machine.
//!
//! `MatchEngine` is synchronous and owns every mutation of the slot table
//! and session counters. The async driver calls into it between
//! animations; nothing here awaits or performs I/O.
//!
//! ## Selection protocol
//!
//! 1. `select` accepts a click only while `Playing`, on a hidden,
//!    non-busy slot, with fewer than `open_cap` open cards
//! 2. `reveal_finished` moves the card into the open buffer; the second
//!    card forms a [`PendingPair`] and counts an attempt
//! 3. `enqueue` appends the pair to the FIFO and tells the caller whether a
//!    resolver must be started
//! 4. The resolver pops pairs with `next_pair` and walks each one through
//!    `begin_resolution` / `adjudicate` / `finish_*`
//! 5. `check_completion` ends the game once every slot is `Matched`

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{CardSlot, SlotPhase, SlotTable};
use crate::core::{CellIndex, ConfigError, EngineConfig};
use crate::session::SessionState;

/// Global engine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Reveal-all preview before play.
    AwaitingPreview,
    Playing,
    /// Terminal.
    Completed,
}

/// Why a click was dropped. Not an error: normal flow control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    NotPlaying,
    /// Masked or off the board.
    NoSlot,
    Matched,
    Busy,
    AlreadyFaceUp,
    OpenCapReached,
}

/// Result of a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The slot starts flipping face up.
    Accepted,
    Ignored(IgnoreReason),
}

impl SelectOutcome {
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Two cards selected in sequence, queued for adjudication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPair {
    pub first: CellIndex,
    pub second: CellIndex,
}

impl PendingPair {
    #[must_use]
    pub const fn new(first: CellIndex, second: CellIndex) -> Self {
        Self { first, second }
    }

    #[must_use]
    pub const fn cells(self) -> [CellIndex; 2] {
        [self.first, self.second]
    }
}

/// First step of resolving a pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionStart {
    /// A card was already matched; the pair is dropped uncounted. Its
    /// other cards are marked `Concealing` and listed here to flip down.
    Skipped { conceal: SmallVec<[CellIndex; 2]> },
    /// Flip these cards face up (marked `Revealing`) before adjudicating.
    /// Usually empty.
    Ready { reveal: SmallVec<[CellIndex; 2]> },
}

/// Outcome of comparing a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjudication {
    /// Counted and recorded; both cards are `Vanishing`.
    Match,
    /// Both cards are `Flashing`.
    Mismatch,
}

/// Read-only view for rendering and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub phase: EnginePhase,
    pub slots: Vec<CardSlot>,
    pub attempts: u32,
    pub matches: u32,
    pub completed: bool,
    pub queued_pairs: usize,
}

impl BoardSnapshot {
    /// The slot at `cell`, if playable.
    #[must_use]
    pub fn slot(&self, cell: CellIndex) -> Option<&CardSlot> {
        self.slots.iter().find(|slot| slot.cell() == cell)
    }
}

/// The pair resolution engine for one session.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    slots: SlotTable,
    session: SessionState,
    open_cap: usize,
    phase: EnginePhase,
    /// Face-up cards waiting for a partner, in reveal order.
    open: SmallVec<[CellIndex; 2]>,
    queue: VecDeque<PendingPair>,
    resolver_running: bool,
}

impl MatchEngine {
    /// Deal the board for `session` and restore its progress.
    ///
    /// Cells in `matched_cells` go straight to `Matched`. A session that is
    /// already complete (or whose cells are all matched) starts in
    /// `Completed`. A fresh session with a preview configured starts in
    /// `AwaitingPreview` with every unmatched card face up.
    pub fn new(
        session: SessionState,
        catalog_size: u32,
        config: &EngineConfig,
    ) -> Result<Self, ConfigError> {
        let mut slots = SlotTable::build(session.layout().clone(), session.seed(), catalog_size)?;

        for slot in slots.iter_mut() {
            if session.is_matched(slot.cell()) {
                slot.set_phase(SlotPhase::Matched);
            }
        }

        let mut engine = Self {
            slots,
            session,
            open_cap: config.open_cap.max(2),
            phase: EnginePhase::Playing,
            open: SmallVec::new(),
            queue: VecDeque::new(),
            resolver_running: false,
        };

        if engine.session.completed() || engine.slots.all_matched() {
            engine.complete();
        } else if config.has_preview() && !engine.session.preview_done() {
            engine.phase = EnginePhase::AwaitingPreview;
            for slot in engine.slots.iter_mut().filter(|slot| !slot.is_matched()) {
                slot.set_phase(SlotPhase::FaceUp);
            }
        }

        tracing::debug!(
            phase = ?engine.phase,
            slots = engine.slots.len(),
            matched = engine.session.matched_cells().len(),
            "match engine ready"
        );

        Ok(engine)
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == EnginePhase::Completed
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    #[must_use]
    pub fn open_cap(&self) -> usize {
        self.open_cap
    }

    #[must_use]
    pub fn queued_pairs(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            phase: self.phase,
            slots: self.slots.iter().copied().collect(),
            attempts: self.session.attempts(),
            matches: self.session.matches(),
            completed: self.session.completed(),
            queued_pairs: self.queue.len(),
        }
    }

    // === Selection ===

    /// Handle a click on `cell`.
    pub fn select(&mut self, cell: CellIndex) -> SelectOutcome {
        use IgnoreReason::*;

        if self.phase != EnginePhase::Playing {
            return SelectOutcome::Ignored(NotPlaying);
        }

        let open = self.slots.open_count();
        let Some(slot) = self.slots.get_mut(cell) else {
            return SelectOutcome::Ignored(NoSlot);
        };

        let reason = if slot.is_matched() {
            Matched
        } else if slot.is_busy() {
            Busy
        } else if slot.is_face_up() {
            AlreadyFaceUp
        } else if open >= self.open_cap {
            OpenCapReached
        } else {
            slot.set_phase(SlotPhase::Revealing);
            return SelectOutcome::Accepted;
        };

        SelectOutcome::Ignored(reason)
    }

    /// The face-up flip for a selected card finished.
    ///
    /// Returns the pair formed when this card is the second open one; the
    /// attempt is already counted and should be persisted by the caller.
    pub fn reveal_finished(&mut self, cell: CellIndex) -> Option<PendingPair> {
        let slot = self.slots.get_mut(cell)?;
        if slot.phase() != SlotPhase::Revealing {
            return None;
        }
        slot.set_phase(SlotPhase::FaceUp);

        self.open.push(cell);
        if self.open.len() < 2 {
            return None;
        }

        let pair = PendingPair::new(self.open[0], self.open[1]);
        self.open.clear();
        self.session.record_attempt();

        tracing::debug!(
            first = %pair.first,
            second = %pair.second,
            attempts = self.session.attempts(),
            "pair formed"
        );

        Some(pair)
    }

    // === Resolver queue ===

    /// Queue a pair. Returns `true` when no resolver is running and the
    /// caller must start one; the running flag is already set.
    pub fn enqueue(&mut self, pair: PendingPair) -> bool {
        if self.is_completed() {
            return false;
        }

        self.queue.push_back(pair);
        if self.resolver_running {
            false
        } else {
            self.resolver_running = true;
            true
        }
    }

    /// Next pair for the running resolver. `None` clears the running flag,
    /// so the resolver must exit.
    pub fn next_pair(&mut self) -> Option<PendingPair> {
        let next = if self.is_completed() {
            None
        } else {
            self.queue.pop_front()
        };

        if next.is_none() {
            self.resolver_running = false;
        }
        next
    }

    #[must_use]
    pub fn resolver_running(&self) -> bool {
        self.resolver_running
    }

    // === Resolution ===

    /// Start resolving `pair`.
    pub fn begin_resolution(&mut self, pair: PendingPair) -> ResolutionStart {
        let matched = pair
            .cells()
            .iter()
            .any(|&cell| self.slots.get(cell).map_or(true, CardSlot::is_matched));
        if matched {
            tracing::debug!(first = %pair.first, second = %pair.second, "skipping stale pair");
            let mut conceal = SmallVec::new();
            for cell in pair.cells() {
                if let Some(slot) = self.slots.get_mut(cell) {
                    if slot.phase() == SlotPhase::FaceUp {
                        slot.set_phase(SlotPhase::Concealing);
                        conceal.push(cell);
                    }
                }
            }
            return ResolutionStart::Skipped { conceal };
        }

        let mut reveal = SmallVec::new();
        for cell in pair.cells() {
            if let Some(slot) = self.slots.get_mut(cell) {
                if slot.phase() == SlotPhase::Hidden {
                    slot.set_phase(SlotPhase::Revealing);
                    reveal.push(cell);
                }
            }
        }

        ResolutionStart::Ready { reveal }
    }

    /// A flip requested by [`ResolutionStart::Ready`] finished.
    pub fn confirm_face_up(&mut self, cell: CellIndex) {
        if let Some(slot) = self.slots.get_mut(cell) {
            if slot.phase() == SlotPhase::Revealing {
                slot.set_phase(SlotPhase::FaceUp);
            }
        }
    }

    /// Compare the two cards and record a match.
    ///
    /// On a match the counters and `matched_cells` change before any
    /// animation, so the caller should persist immediately.
    pub fn adjudicate(&mut self, pair: PendingPair) -> Adjudication {
        let same = match (self.slots.get(pair.first), self.slots.get(pair.second)) {
            (Some(a), Some(b)) => a.pair() == b.pair(),
            _ => false,
        };

        let (adjudication, phase) = if same {
            self.session.record_match(pair.first, pair.second);
            (Adjudication::Match, SlotPhase::Vanishing)
        } else {
            (Adjudication::Mismatch, SlotPhase::Flashing)
        };

        self.set_phases(pair, phase);

        tracing::debug!(
            first = %pair.first,
            second = %pair.second,
            ?adjudication,
            matches = self.session.matches(),
            "pair adjudicated"
        );

        adjudication
    }

    /// The vanish effect for a matched pair finished.
    pub fn finish_vanish(&mut self, pair: PendingPair) {
        self.set_phases(pair, SlotPhase::Matched);
    }

    /// The mismatch flash finished; both cards start flipping down.
    pub fn begin_conceal(&mut self, pair: PendingPair) {
        self.set_phases(pair, SlotPhase::Concealing);
    }

    /// A face-down flip finished.
    pub fn finish_conceal(&mut self, cell: CellIndex) {
        if let Some(slot) = self.slots.get_mut(cell) {
            if slot.phase() == SlotPhase::Concealing {
                slot.set_phase(SlotPhase::Hidden);
            }
        }
    }

    /// Move to `Completed` if every slot is matched.
    ///
    /// Returns `true` exactly once per game, when the transition happens;
    /// the caller persists and signals game over. Queued pairs are dropped.
    pub fn check_completion(&mut self) -> bool {
        if self.is_completed() || !self.slots.all_matched() {
            return false;
        }
        self.complete();
        tracing::info!(
            attempts = self.session.attempts(),
            matches = self.session.matches(),
            "game over, all pairs matched"
        );
        true
    }

    // === Preview ===

    /// Preview time is up: every unmatched card is marked `Concealing` and
    /// returned so the caller can flip it down.
    pub fn end_preview(&mut self) -> Vec<CellIndex> {
        if self.phase != EnginePhase::AwaitingPreview {
            return Vec::new();
        }

        self.slots
            .iter_mut()
            .filter(|slot| !slot.is_matched())
            .map(|slot| {
                slot.set_phase(SlotPhase::Concealing);
                slot.cell()
            })
            .collect()
    }

    /// All preview flips finished; play may begin.
    pub fn finish_preview(&mut self) {
        if self.phase != EnginePhase::AwaitingPreview {
            return;
        }
        self.session.mark_preview_done();
        self.phase = EnginePhase::Playing;
        tracing::info!("preview finished");
    }

    fn complete(&mut self) {
        self.phase = EnginePhase::Completed;
        self.session.mark_completed();
        self.queue.clear();
        self.open.clear();
    }

    fn set_phases(&mut self, pair: PendingPair, phase: SlotPhase) {
        for cell in pair.cells() {
            if let Some(slot) = self.slots.get_mut(cell) {
                slot.set_phase(phase);
            }
        }
    }
}
