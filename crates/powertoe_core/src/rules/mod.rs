//! Game rules.
//!
//! Pure functions over a [`Board`]; nothing here mutates state. The search
//! and the session both evaluate positions through [`evaluate`].

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, Line, LineKind, check_winner, classify_line, winning_line};

use super::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Verdict on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// No line and at least one empty cell.
    InProgress,
    /// `player` holds every cell of `line`.
    Win {
        /// The winner.
        player: Player,
        /// The winning line.
        line: Line,
    },
    /// Board full with no line.
    Draw,
}

impl GameResult {
    /// Win or Draw.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameResult::Win { player, .. } => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::InProgress => write!(f, "In progress"),
            GameResult::Win { player, line } => {
                write!(f, "Player {} wins on {:?}", player, line)
            }
            GameResult::Draw => write!(f, "Draw"),
        }
    }
}

/// Evaluates a board: first winning line in fixed order, else draw or in progress.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> GameResult {
    if let Some((player, line)) = winning_line(board) {
        return GameResult::Win { player, line };
    }
    if is_draw(board) {
        GameResult::Draw
    } else {
        GameResult::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CELL_COUNT, Cell};

    #[test]
    fn test_evaluate_is_pure() {
        let board: Board = "XX. OO. ...".parse().unwrap();
        let before = board;
        assert_eq!(evaluate(&board), evaluate(&board));
        assert_eq!(board, before);
        assert_eq!(evaluate(&board), GameResult::InProgress);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board: Board = "XOX OXO OXO".parse().unwrap();
        assert_eq!(evaluate(&board), GameResult::Draw);
    }

    fn board_from_code(mut code: usize) -> Board {
        let mut cells = [Cell::Empty; CELL_COUNT];
        for cell in &mut cells {
            *cell = match code % 3 {
                0 => Cell::Empty,
                1 => Cell::Occupied(Player::X),
                _ => Cell::Occupied(Player::O),
            };
            code /= 3;
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_evaluate_over_every_cell_assignment() {
        let mut draws = 0;
        for code in 0..3usize.pow(CELL_COUNT as u32) {
            let board = board_from_code(code);
            let before = board;
            let result = evaluate(&board);
            assert_eq!(evaluate(&board), result, "unstable on\n{board}");
            assert_eq!(board, before);

            let line = winning_line(&board);
            match result {
                GameResult::Win { player, line: won } => {
                    assert_eq!(line, Some((player, won)));
                }
                GameResult::Draw => {
                    assert!(board.is_full() && line.is_none(), "bad draw on\n{board}");
                    draws += 1;
                }
                GameResult::InProgress => {
                    assert!(!board.is_full() && line.is_none(), "open on\n{board}");
                }
            }
            if board.is_full() && line.is_none() {
                assert_eq!(result, GameResult::Draw, "full board not drawn\n{board}");
            }
        }
        // Full boards in which neither mark completes a line.
        assert!(draws > 0);
    }

    #[test]
    fn test_full_board_with_line_is_win() {
        let board: Board = "XXX OOX OXO".parse().unwrap();
        assert_eq!(
            evaluate(&board),
            GameResult::Win {
                player: Player::X,
                line: [0, 1, 2]
            }
        );
    }
}
