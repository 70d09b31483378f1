//! Shared, lock-protected session with timed AI moves and cooldown ticks.
//!
//! Every operation takes the session lock once, so a cooldown tick never
//! interleaves with a half-applied move. AI moves are delayed tasks tagged
//! with the session epoch; a reset aborts the pending task, and a task that
//! still wakes under a newer epoch drops its move.

use powertoe_core::{
    Activation, EffectSummary, GameSession, Player, PowerUpKind, SessionError, SessionPhase,
};
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
struct Shared {
    session: GameSession,
    rng: StdRng,
    pending_ai: Option<AbortHandle>,
}

/// Cloneable handle to one running game.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Shared>>,
}

impl SessionHandle {
    /// Wraps a session and the RNG its AI draws from.
    #[instrument(skip_all)]
    pub fn new(session: GameSession, rng: StdRng) -> Self {
        info!("Creating session handle");
        Self {
            inner: Arc::new(Mutex::new(Shared {
                session,
                rng,
                pending_ai: None,
            })),
        }
    }

    /// Runs `f` against the session under the lock.
    pub async fn read<T>(&self, f: impl FnOnce(&GameSession) -> T) -> T {
        let shared = self.inner.lock().await;
        f(&shared.session)
    }

    /// Current phase.
    pub async fn phase(&self) -> SessionPhase {
        self.read(|session| session.phase()).await
    }

    /// Places a mark or resolves the armed power-up at `index`.
    #[instrument(skip(self))]
    pub async fn select_cell(&self, index: usize) -> Result<Option<EffectSummary>, SessionError> {
        let mut shared = self.inner.lock().await;
        shared.session.select_cell(index)
    }

    /// Activates a power-up.
    #[instrument(skip(self))]
    pub async fn activate_power_up(
        &self,
        player: Player,
        kind: PowerUpKind,
    ) -> Result<Activation, SessionError> {
        let mut shared = self.inner.lock().await;
        shared.session.activate_power_up(player, kind)
    }

    /// One cooldown tick.
    pub async fn tick_cooldowns(&self) {
        let mut shared = self.inner.lock().await;
        shared.session.tick_cooldowns();
    }

    /// Resets the game and abandons any pending AI move.
    #[instrument(skip(self))]
    pub async fn reset(&self) {
        let mut shared = self.inner.lock().await;
        if let Some(pending) = shared.pending_ai.take() {
            debug!("Aborting pending AI move");
            pending.abort();
        }
        shared.session.reset();
    }

    /// Schedules the AI to move after `delay`.
    ///
    /// Returns `None` when it is not the AI's turn. The task resolves to the
    /// chosen cell, or `None` if the game moved on while it waited.
    #[instrument(skip(self))]
    pub async fn schedule_ai_move(&self, delay: Duration) -> Option<JoinHandle<Option<usize>>> {
        let mut shared = self.inner.lock().await;
        if !shared.session.is_ai_turn() {
            return None;
        }
        let epoch = shared.session.epoch();
        let inner = Arc::clone(&self.inner);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = inner.lock().await;
            let shared = &mut *guard;
            shared.pending_ai = None;
            if shared.session.epoch() != epoch || !shared.session.is_ai_turn() {
                debug!(epoch, current = shared.session.epoch(), "Discarding stale AI move");
                return None;
            }
            match shared.session.play_ai_turn(&mut shared.rng) {
                Ok(index) => Some(index),
                Err(err) => {
                    warn!(%err, "AI move failed");
                    None
                }
            }
        });

        if let Some(previous) = shared.pending_ai.replace(task.abort_handle()) {
            previous.abort();
        }
        debug!(epoch, ?delay, "AI move scheduled");
        Some(task)
    }

    /// Ticks cooldowns every `period` until the returned task is aborted.
    pub fn spawn_cooldown_ticker(&self, period: Duration) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                handle.tick_cooldowns().await;
            }
        })
    }
}
