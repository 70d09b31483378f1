//! Outbound notifications for UI and statistics collaborators.

use super::phase::AiOpponent;
use crate::power_ups::{EffectSummary, PowerUpKind};
use crate::rules::GameResult;
use crate::{Board, Player};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One power-up activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerUpUse {
    /// Who used it.
    pub player: Player,
    /// What was used.
    pub kind: PowerUpKind,
}

/// Handed to observers when a game ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameSummary {
    result: GameResult,
    move_count: usize,
    elapsed: Duration,
    power_ups_used: Vec<PowerUpUse>,
    opponent: Option<AiOpponent>,
}

impl GameSummary {
    /// Assembles a summary; sessions build one when a game ends.
    pub fn new(
        result: GameResult,
        move_count: usize,
        elapsed: Duration,
        power_ups_used: Vec<PowerUpUse>,
        opponent: Option<AiOpponent>,
    ) -> Self {
        Self {
            result,
            move_count,
            elapsed,
            power_ups_used,
            opponent,
        }
    }
}

/// Receives session events. All methods default to doing nothing.
///
/// Observers are owned by the session and called synchronously after the
/// state change they describe has been committed.
pub trait GameObserver: Send {
    /// `player` placed a mark at `index`; `board` is the position after it.
    fn on_move_applied(&mut self, _board: &Board, _player: Player, _index: usize) {}

    /// The game reached Win or Draw.
    fn on_game_ended(&mut self, _summary: &GameSummary) {}

    /// A power-up took effect.
    fn on_power_up_resolved(&mut self, _player: Player, _kind: PowerUpKind, _effect: &EffectSummary) {}
}
