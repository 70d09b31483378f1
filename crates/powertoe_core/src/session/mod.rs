//! Game session: turn order, power-up resolution and AI turns.
//!
//! All mutations of a game go through [`GameSession`]. Each operation either
//! commits completely or returns a [`SessionError`] with nothing changed.

mod error;
mod observer;
mod phase;

pub use error::SessionError;
pub use observer::{GameObserver, GameSummary, PowerUpUse};
pub use phase::{Activation, AiOpponent, SessionConfig, SessionPhase};

use crate::invariants::assert_invariants;
use crate::power_ups::{
    EffectSummary, NoEffectReason, PowerUpInventory, PowerUpKind, PowerUpRules, PowerUpState,
    ShieldSet, effects,
};
use crate::rules::{GameResult, evaluate};
use crate::search::Searcher;
use crate::{Board, Player};
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Placements undone by one Time Warp.
const TIME_WARP_DEPTH: usize = 2;

/// Pending freeze: `player` skips the next `turns` turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freeze {
    /// The frozen player.
    pub player: Player,
    /// Turns still to skip.
    pub turns: u32,
}

/// A single game with power-ups and an optional AI opponent.
pub struct GameSession {
    board: Board,
    phase: SessionPhase,
    power_ups: PowerUpState,
    shields: ShieldSet,
    freeze: Option<Freeze>,
    double_move: Option<Player>,
    snapshots: Vec<Board>,
    move_count: usize,
    power_ups_used: Vec<PowerUpUse>,
    started_at: Instant,
    epoch: u64,
    rules: PowerUpRules,
    searcher: Searcher,
    opponent: Option<AiOpponent>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("board", &self.board)
            .field("phase", &self.phase)
            .field("freeze", &self.freeze)
            .field("double_move", &self.double_move)
            .field("move_count", &self.move_count)
            .field("epoch", &self.epoch)
            .field("opponent", &self.opponent)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    /// Creates a session in `AwaitingMove(X)`.
    #[instrument]
    pub fn new(config: SessionConfig) -> Self {
        info!(opponent = ?config.opponent, "Creating game session");
        Self {
            board: Board::new(),
            phase: SessionPhase::AwaitingMove(Player::X),
            power_ups: PowerUpState::new(),
            shields: ShieldSet::new(),
            freeze: None,
            double_move: None,
            snapshots: Vec::new(),
            move_count: 0,
            power_ups_used: Vec::new(),
            started_at: Instant::now(),
            epoch: 0,
            rules: config.rules,
            searcher: Searcher::new(config.policy),
            opponent: config.opponent,
            observers: Vec::new(),
        }
    }

    /// Registers an observer, builder style.
    pub fn with_observer(mut self, observer: Box<dyn GameObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Registers an observer.
    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    // ─────────────────────────────────────────────────────────────
    //  Accessors
    // ─────────────────────────────────────────────────────────────

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Power-ups of `player`.
    pub fn power_ups(&self, player: Player) -> &PowerUpInventory {
        self.power_ups.for_player(player)
    }

    /// Checks whether `index` is shielded.
    pub fn is_shielded(&self, index: usize) -> bool {
        self.shields.contains(index)
    }

    /// Shielded cells.
    pub fn shields(&self) -> &ShieldSet {
        &self.shields
    }

    /// Pending freeze, if any.
    pub fn freeze(&self) -> Option<Freeze> {
        self.freeze
    }

    /// Player with an unused double move, if any.
    pub fn double_move(&self) -> Option<Player> {
        self.double_move
    }

    /// Placements made since the last reset.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Board snapshots available to Time Warp.
    pub fn history_len(&self) -> usize {
        self.snapshots.len()
    }

    /// Power-ups used since the last reset.
    pub fn power_ups_used(&self) -> &[PowerUpUse] {
        &self.power_ups_used
    }

    /// Incremented on every reset.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Power-up rules in force.
    pub fn rules(&self) -> &PowerUpRules {
        &self.rules
    }

    /// The AI side, if any.
    pub fn opponent(&self) -> Option<AiOpponent> {
        self.opponent
    }

    /// Checks whether the AI should move now.
    pub fn is_ai_turn(&self) -> bool {
        match (self.opponent, self.phase) {
            (Some(ai), SessionPhase::AwaitingMove(player)) => *ai.player() == player,
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn board_mut_for_test(&mut self) -> &mut Board {
        &mut self.board
    }

    // ─────────────────────────────────────────────────────────────
    //  Inbound operations
    // ─────────────────────────────────────────────────────────────

    /// Places the active player's mark at `index`.
    ///
    /// Rejected while the AI is to move; the AI plays through
    /// [`GameSession::play_ai_turn`].
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn apply_placement(&mut self, index: usize) -> Result<(), SessionError> {
        let player = match self.phase {
            SessionPhase::AwaitingMove(player) => player,
            SessionPhase::Terminal(_) => return Err(SessionError::GameOver),
            phase @ SessionPhase::AwaitingPowerUpTarget(..) => {
                return Err(SessionError::InvalidStateTransition {
                    operation: "place a mark",
                    phase,
                });
            }
        };
        if self.is_ai_turn() {
            warn!(%player, "Placement attempted during AI turn");
            return Err(SessionError::NotPlayersTurn(player));
        }
        self.place(player, index)
    }

    /// Routes a cell selection the way a click would: as the armed
    /// power-up's target if one is armed, else as a placement.
    #[instrument(skip(self))]
    pub fn select_cell(&mut self, index: usize) -> Result<Option<EffectSummary>, SessionError> {
        match self.phase {
            SessionPhase::AwaitingPowerUpTarget(..) => {
                self.supply_power_up_target(index).map(Some)
            }
            _ => self.apply_placement(index).map(|_| None),
        }
    }

    /// Activates `kind` for `player`.
    ///
    /// The cooldown is charged as soon as the activation is accepted, so an
    /// armed power-up whose target turns out to be useless is still spent.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn activate_power_up(
        &mut self,
        player: Player,
        kind: PowerUpKind,
    ) -> Result<Activation, SessionError> {
        let active = match self.phase {
            SessionPhase::AwaitingMove(active) => active,
            SessionPhase::Terminal(_) => return Err(SessionError::GameOver),
            phase @ SessionPhase::AwaitingPowerUpTarget(..) => {
                return Err(SessionError::InvalidStateTransition {
                    operation: "activate a power-up",
                    phase,
                });
            }
        };
        if player != active {
            warn!(%player, %active, "Power-up activated out of turn");
            return Err(SessionError::NotPlayersTurn(player));
        }
        if !self.power_ups.for_player(player).is_available(kind) {
            debug!(%player, %kind, "Power-up on cooldown");
            return Err(SessionError::PowerUpUnavailable(kind));
        }

        let spec = self.rules.spec(kind);
        self.power_ups
            .for_player_mut(player)
            .consume(kind, *spec.cooldown());
        self.power_ups_used.push(PowerUpUse { player, kind });
        info!(%player, %kind, cooldown = spec.cooldown(), "Power-up activated");

        let activation = match kind {
            PowerUpKind::Freeze => {
                let freeze = Freeze {
                    player: player.opponent(),
                    turns: self.rules.freeze_turns,
                };
                self.freeze = (freeze.turns > 0).then_some(freeze);
                Activation::Resolved(EffectSummary::Frozen {
                    opponent: freeze.player,
                    turns: freeze.turns,
                })
            }
            PowerUpKind::DoubleMove => {
                self.double_move = Some(player);
                Activation::Resolved(EffectSummary::DoubleMoveArmed)
            }
            PowerUpKind::TimeWarp => Activation::Resolved(self.time_warp()),
            PowerUpKind::Steal | PowerUpKind::Bomb | PowerUpKind::Shield => {
                self.phase = SessionPhase::AwaitingPowerUpTarget(player, kind);
                Activation::Armed(kind)
            }
        };

        if let Activation::Resolved(effect) = &activation {
            self.notify_power_up(player, kind, effect);
            if effect.touches_board() {
                self.settle_after_effect();
            }
        }
        assert_invariants(self);
        Ok(activation)
    }

    /// Resolves the armed power-up on `index`.
    ///
    /// An out-of-range index is rejected and the power-up stays armed.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn supply_power_up_target(&mut self, index: usize) -> Result<EffectSummary, SessionError> {
        let (player, kind) = match self.phase {
            SessionPhase::AwaitingPowerUpTarget(player, kind) => (player, kind),
            SessionPhase::Terminal(_) => return Err(SessionError::GameOver),
            phase @ SessionPhase::AwaitingMove(_) => {
                return Err(SessionError::InvalidStateTransition {
                    operation: "supply a power-up target",
                    phase,
                });
            }
        };
        self.board.get(index)?;

        let effect = match kind {
            PowerUpKind::Steal => effects::steal(&mut self.board, &self.shields, index, player)?,
            PowerUpKind::Bomb => effects::bomb(&mut self.board, &self.shields, index)?,
            PowerUpKind::Shield => effects::shield(&mut self.shields, index)?,
            PowerUpKind::Freeze | PowerUpKind::DoubleMove | PowerUpKind::TimeWarp => {
                return Err(SessionError::InvalidStateTransition {
                    operation: "target an immediate power-up",
                    phase: self.phase,
                });
            }
        };

        info!(%player, %kind, index, ?effect, "Power-up resolved");
        self.phase = SessionPhase::AwaitingMove(player);
        self.notify_power_up(player, kind, &effect);
        if effect.touches_board() {
            self.settle_after_effect();
        }
        assert_invariants(self);
        Ok(effect)
    }

    /// One cooldown tick for both players.
    #[instrument(level = "debug", skip(self))]
    pub fn tick_cooldowns(&mut self) {
        self.power_ups.tick();
        assert_invariants(self);
    }

    /// Starts a new game: empty board, fresh power-ups, X to move.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.phase = SessionPhase::AwaitingMove(Player::X);
        self.power_ups = PowerUpState::new();
        self.shields = ShieldSet::new();
        self.freeze = None;
        self.double_move = None;
        self.snapshots.clear();
        self.move_count = 0;
        self.power_ups_used.clear();
        self.started_at = Instant::now();
        self.epoch += 1;
        info!(epoch = self.epoch, "Session reset");
    }

    /// Lets the AI play its move. Returns the chosen cell.
    #[instrument(skip(self, rng), fields(epoch = self.epoch))]
    pub fn play_ai_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, SessionError> {
        if self.phase.is_terminal() {
            return Err(SessionError::GameOver);
        }
        let ai = match self.opponent {
            Some(ai) if self.is_ai_turn() => ai,
            _ => return Err(SessionError::NotAiTurn),
        };
        let index = self
            .searcher
            .select_move(&self.board, *ai.player(), *ai.difficulty(), rng)?;
        self.place(*ai.player(), index)?;
        Ok(index)
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    fn place(&mut self, player: Player, index: usize) -> Result<(), SessionError> {
        let before = self.board;
        self.board.set(index, player)?;
        self.snapshots.push(before);
        self.move_count += 1;
        debug!(%player, index, move_count = self.move_count, "Mark placed");

        let board = self.board;
        for observer in &mut self.observers {
            observer.on_move_applied(&board, player, index);
        }

        let result = evaluate(&self.board);
        if result.is_terminal() {
            self.finish(result);
        } else {
            self.end_placement(player);
        }
        assert_invariants(self);
        Ok(())
    }

    /// Turn handling after a non-terminal placement.
    fn end_placement(&mut self, player: Player) {
        if self.double_move == Some(player) {
            self.double_move = None;
            debug!(%player, "Double move: placing again");
            self.phase = SessionPhase::AwaitingMove(player);
            return;
        }

        let next = player.opponent();
        match self.freeze {
            Some(mut freeze) if freeze.player == next => {
                freeze.turns -= 1;
                self.freeze = (freeze.turns > 0).then_some(freeze);
                info!(frozen = %next, remaining = freeze.turns, "Frozen turn skipped");
                self.phase = SessionPhase::AwaitingMove(player);
            }
            _ => self.phase = SessionPhase::AwaitingMove(next),
        }
    }

    fn time_warp(&mut self) -> EffectSummary {
        let undone = self.snapshots.len().min(TIME_WARP_DEPTH);
        if undone == 0 {
            return EffectSummary::NoEffect(NoEffectReason::NothingToUndo);
        }
        let keep = self.snapshots.len() - undone;
        self.board = self.snapshots[keep];
        self.snapshots.truncate(keep);
        EffectSummary::TimeWarped { undone }
    }

    /// Re-evaluates the board after a power-up changed it.
    fn settle_after_effect(&mut self) {
        let result = evaluate(&self.board);
        if result.is_terminal() {
            self.finish(result);
        }
    }

    fn notify_power_up(&mut self, player: Player, kind: PowerUpKind, effect: &EffectSummary) {
        for observer in &mut self.observers {
            observer.on_power_up_resolved(player, kind, effect);
        }
    }

    fn finish(&mut self, result: GameResult) {
        self.phase = SessionPhase::Terminal(result);
        self.freeze = None;
        self.double_move = None;
        let summary = GameSummary::new(
            result,
            self.move_count,
            self.started_at.elapsed(),
            self.power_ups_used.clone(),
            self.opponent,
        );
        info!(%result, moves = self.move_count, "Game over");
        for observer in &mut self.observers {
            observer.on_game_ended(&summary);
        }
    }
}
