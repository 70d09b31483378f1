//! Session errors.
//!
//! Every variant except [`SessionError::Search`] is an expected, recoverable
//! input problem: the session state is left exactly as it was.

use super::phase::SessionPhase;
use crate::power_ups::PowerUpKind;
use crate::search::SearchError;
use crate::{BoardError, Player};
use derive_more::{Display, Error};

/// Rejected session operation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// Index outside 0-8.
    #[display("Cell index {} is out of bounds (must be 0-8)", _0)]
    InvalidIndex(#[error(not(source))] usize),
    /// Placement on a non-empty cell.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(#[error(not(source))] usize),
    /// Power-up on cooldown.
    #[display("Power-up {} is not available", _0)]
    PowerUpUnavailable(#[error(not(source))] PowerUpKind),
    /// Operation not allowed in the current phase.
    #[display("Cannot {} while {}", operation, phase)]
    InvalidStateTransition {
        /// What the caller tried.
        operation: &'static str,
        /// Phase at the time.
        phase: SessionPhase,
    },
    /// Someone other than the active player tried to act.
    #[display("It's not {}'s turn", _0)]
    NotPlayersTurn(#[error(not(source))] Player),
    /// The game has ended; reset first.
    #[display("Game is already over")]
    GameOver,
    /// No AI opponent, or it is not the AI's turn.
    #[display("It is not the AI's turn")]
    NotAiTurn,
    /// Board rejected a mutation for another reason.
    #[display("Board error: {}", _0)]
    Board(BoardError),
    /// The search was invoked on a finished board.
    #[display("Search error: {}", _0)]
    Search(SearchError),
}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::InvalidIndex(index) => SessionError::InvalidIndex(index),
            BoardError::CellOccupied(index) => SessionError::CellOccupied(index),
            other => SessionError::Board(other),
        }
    }
}

impl From<SearchError> for SessionError {
    fn from(err: SearchError) -> Self {
        SessionError::Search(err)
    }
}
