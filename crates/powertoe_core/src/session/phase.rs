//! Session phases and configuration.

use crate::power_ups::{EffectSummary, PowerUpKind, PowerUpRules};
use crate::rules::GameResult;
use crate::search::{Difficulty, DifficultyPolicy};
use crate::Player;
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Where the session is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SessionPhase {
    /// `player` may place a mark or activate a power-up.
    #[display("awaiting a move from {}", _0)]
    AwaitingMove(Player),
    /// `player` armed a targeted power-up and must pick its cell.
    #[display("awaiting a {} target from {}", _1, _0)]
    AwaitingPowerUpTarget(Player, PowerUpKind),
    /// The game is over until reset.
    #[display("finished ({})", _0)]
    Terminal(GameResult),
}

impl SessionPhase {
    /// The player expected to act, if the game is running.
    pub fn active_player(&self) -> Option<Player> {
        match self {
            SessionPhase::AwaitingMove(player) | SessionPhase::AwaitingPowerUpTarget(player, _) => {
                Some(*player)
            }
            SessionPhase::Terminal(_) => None,
        }
    }

    /// Checks for the terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Terminal(_))
    }
}

/// Result of a successful power-up activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// An immediate power-up took effect.
    Resolved(EffectSummary),
    /// A targeted power-up now waits for its cell.
    Armed(PowerUpKind),
}

/// The computer-controlled side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct AiOpponent {
    player: Player,
    difficulty: Difficulty,
}

/// Everything needed to build a [`super::GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Power-up cooldowns and freeze length.
    pub rules: PowerUpRules,
    /// Accuracy per difficulty tier.
    pub policy: DifficultyPolicy,
    /// The AI side; `None` for two local players.
    pub opponent: Option<AiOpponent>,
}
