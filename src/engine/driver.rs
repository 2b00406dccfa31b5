//! Async orchestration around [`MatchEngine`].
//!
//! One session runs as a handful of Tokio tasks:
//!
//! - **input**: receives clicked cells and applies the selection rules
//! - **reveal** (one per accepted click): awaits the face-up flip, then
//!   forms and queues pairs
//! - **resolver** (at most one at a time): drains the pair queue in FIFO
//!   order, awaiting each pair's flash or vanish before the next
//! - **preview** (fresh games only): waits out the reveal-all phase
//!
//! All state lives in one `MatchEngine` behind a mutex that is never held
//! across an await. The resolver's running flag sits inside the engine, so
//! "queue and maybe start a resolver" is a single locked step.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::effects::{EngineEvent, Effects};
use super::state::{
    Adjudication, BoardSnapshot, EnginePhase, MatchEngine, PendingPair, ResolutionStart,
    SelectOutcome,
};
use crate::core::{CellIndex, ConfigError, DifficultyDatabase, EngineConfig};
use crate::session::{self, SaveStore, SessionContext, SessionState};

/// Receiver for [`EngineEvent`]s.
pub type EngineEvents = mpsc::UnboundedReceiver<EngineEvent>;

struct Shared<E> {
    engine: Arc<Mutex<MatchEngine>>,
    effects: E,
    store: Arc<dyn SaveStore>,
    events: mpsc::UnboundedSender<EngineEvent>,
    config: EngineConfig,
}

impl<E: Effects> Shared<E> {
    fn lock(&self) -> MutexGuard<'_, MatchEngine> {
        lock_engine(&self.engine)
    }

    fn persist(&self, engine: &MatchEngine) {
        session::persist(self.store.as_ref(), engine.session());
    }

    fn emit(&self, event: EngineEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

fn lock_engine(engine: &Mutex<MatchEngine>) -> MutexGuard<'_, MatchEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running session.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) stops
/// accepting input. Pairs already queued and animations in flight still
/// run to completion.
pub struct EngineHandle {
    input: mpsc::UnboundedSender<CellIndex>,
    engine: Arc<Mutex<MatchEngine>>,
    input_task: JoinHandle<()>,
}

impl EngineHandle {
    /// Build the board for `session`, save it, and start its tasks.
    ///
    /// Must be called from within a Tokio runtime. Fails, without starting
    /// anything or touching `store`, if the board cannot be built.
    pub fn start<E: Effects>(
        session: SessionState,
        catalog_size: u32,
        config: EngineConfig,
        effects: E,
        store: Arc<dyn SaveStore>,
    ) -> Result<(Self, EngineEvents), ConfigError> {
        let engine = MatchEngine::new(session, catalog_size, &config).inspect_err(|err| {
            tracing::error!(%err, "cannot build board");
        })?;

        for slot in engine.slots().iter() {
            effects.present(slot.cell(), slot.phase());
        }

        let phase = engine.phase();
        let engine = Arc::new(Mutex::new(engine));
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let shared = Arc::new(Shared {
            engine: Arc::clone(&engine),
            effects,
            store,
            events: event_tx,
            config,
        });

        // The board is valid, so the save slot may now be replaced.
        shared.persist(&shared.lock());

        match phase {
            EnginePhase::Completed => {
                shared.emit(EngineEvent::GameOver);
            }
            EnginePhase::AwaitingPreview => {
                tokio::spawn(run_preview(Arc::clone(&shared)));
            }
            EnginePhase::Playing => {}
        }

        let input_task = tokio::spawn(run_input(shared, input_rx));

        Ok((
            Self {
                input: input_tx,
                engine,
                input_task,
            },
            event_rx,
        ))
    }

    /// Resolve `context` against `store` and start the session it names.
    ///
    /// The difficulty table supplies the face catalog size and timings. An
    /// unknown difficulty or a board that cannot be built leaves the
    /// existing save untouched.
    pub fn launch<E: Effects>(
        context: SessionContext,
        difficulties: &DifficultyDatabase,
        effects: E,
        store: Arc<dyn SaveStore>,
    ) -> Result<(Self, EngineEvents), ConfigError> {
        let session = context.into_session(store.as_ref());
        let entry = difficulties.get(session.difficulty())?;
        Self::start(session, entry.catalog_size, entry.engine_config(), effects, store)
    }

    /// Report a click on `cell`. Invalid clicks are silently ignored.
    pub fn select(&self, cell: CellIndex) {
        if self.input.send(cell).is_err() {
            tracing::trace!(%cell, "input closed, dropping click");
        }
    }

    /// Current board state.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        lock_engine(&self.engine).snapshot()
    }

    /// Current progress, as it would be saved.
    #[must_use]
    pub fn session(&self) -> SessionState {
        lock_engine(&self.engine).session().clone()
    }

    /// Stop accepting input.
    pub fn shutdown(self) {}
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.input_task.abort();
    }
}

async fn run_input<E: Effects>(
    shared: Arc<Shared<E>>,
    mut input: mpsc::UnboundedReceiver<CellIndex>,
) {
    while let Some(cell) = input.recv().await {
        let outcome = shared.lock().select(cell);
        match outcome {
            SelectOutcome::Accepted => {
                tracing::debug!(%cell, "selection accepted");
                tokio::spawn(run_reveal(Arc::clone(&shared), cell));
            }
            SelectOutcome::Ignored(reason) => {
                tracing::trace!(%cell, ?reason, "selection ignored");
            }
        }
    }
}

async fn run_reveal<E: Effects>(shared: Arc<Shared<E>>, cell: CellIndex) {
    shared.effects.flip(cell, true).await;

    let start_resolver = {
        let mut engine = shared.lock();
        match engine.reveal_finished(cell) {
            Some(pair) => {
                shared.persist(&engine);
                engine.enqueue(pair)
            }
            None => false,
        }
    };

    if start_resolver {
        tokio::spawn(run_resolver(shared));
    }
}

async fn run_resolver<E: Effects>(shared: Arc<Shared<E>>) {
    loop {
        let next = shared.lock().next_pair();
        let Some(pair) = next else {
            break;
        };

        if let Some(matched) = resolve_pair(&shared, pair).await {
            shared.emit(EngineEvent::Settled {
                matched,
                cells: pair.cells(),
            });
        }

        let completed = {
            let mut engine = shared.lock();
            let completed = engine.check_completion();
            if completed {
                shared.persist(&engine);
            }
            completed
        };

        if completed {
            shared.emit(EngineEvent::GameOver);
        }
    }
}

/// Run one pair to its final state. `None` if the pair was skipped,
/// otherwise whether it matched.
async fn resolve_pair<E: Effects>(shared: &Shared<E>, pair: PendingPair) -> Option<bool> {
    let start = shared.lock().begin_resolution(pair);
    let reveal = match start {
        ResolutionStart::Ready { reveal } => reveal,
        ResolutionStart::Skipped { conceal } => {
            for cell in conceal {
                shared.effects.flip(cell, false).await;
                shared.lock().finish_conceal(cell);
            }
            return None;
        }
    };

    for cell in reveal {
        shared.effects.flip(cell, true).await;
        shared.lock().confirm_face_up(cell);
    }

    let adjudication = {
        let mut engine = shared.lock();
        let adjudication = engine.adjudicate(pair);
        if adjudication == Adjudication::Match {
            shared.persist(&engine);
        }
        adjudication
    };

    let [first, second] = pair.cells();
    let effects = &shared.effects;

    match adjudication {
        Adjudication::Match => {
            let vanish = shared.config.match_vanish;
            tokio::join!(effects.vanish(first, vanish), effects.vanish(second, vanish));
            shared.lock().finish_vanish(pair);
            Some(true)
        }
        Adjudication::Mismatch => {
            let flash = shared.config.mismatch_flash;
            tokio::join!(effects.flash(first, flash), effects.flash(second, flash));
            shared.lock().begin_conceal(pair);

            tokio::join!(effects.flip(first, false), effects.flip(second, false));
            let mut engine = shared.lock();
            engine.finish_conceal(first);
            engine.finish_conceal(second);
            Some(false)
        }
    }
}

async fn run_preview<E: Effects>(shared: Arc<Shared<E>>) {
    tokio::time::sleep(shared.config.preview).await;

    let cells = shared.lock().end_preview();
    for cell in cells {
        shared.effects.flip(cell, false).await;
        shared.lock().finish_conceal(cell);
    }

    let mut engine = shared.lock();
    engine.finish_preview();
    shared.persist(&engine);
}
