//! Tic-tac-toe with power-ups.
//!
//! Pure game logic with no I/O: board and rules, power-up effects, the
//! minimax AI with difficulty tiers, and the [`GameSession`] state machine
//! that ties them together. Front-ends drive a session and listen through
//! [`GameObserver`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod invariants;
pub mod position;
pub mod power_ups;
pub mod rules;
pub mod search;
pub mod session;
mod types;

pub use position::Position;
pub use power_ups::{
    CooldownTable, EffectSummary, NoEffectReason, PowerUpKind, PowerUpRules, PowerUpSlot,
};
pub use rules::{GameResult, LineKind, evaluate};
pub use search::{Difficulty, DifficultyPolicy, SearchError, Searcher};
pub use session::{
    Activation, AiOpponent, Freeze, GameObserver, GameSession, GameSummary, PowerUpUse, SessionConfig,
    SessionError, SessionPhase,
};
pub use types::{Board, BoardError, CELL_COUNT, Cell, Player};
