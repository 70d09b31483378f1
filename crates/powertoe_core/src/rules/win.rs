//! Win-line detection and line classification.

use super::super::{Board, Cell, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Three cell indices that win when uniformly occupied.
pub type Line = [usize; 3];

/// The eight winning lines: rows, then columns, then diagonals.
pub const LINES: [Line; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Orientation of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum LineKind {
    /// A row.
    Horizontal,
    /// A column.
    Vertical,
    /// Top-left to bottom-right.
    DiagonalMain,
    /// Top-right to bottom-left.
    DiagonalAnti,
}

/// Classifies a line by index arithmetic.
///
/// Returns `None` for triples that are not one of [`LINES`].
#[instrument]
pub fn classify_line(line: Line) -> Option<LineKind> {
    let [a, b, c] = line;
    if a / 3 == b / 3 && b / 3 == c / 3 {
        Some(LineKind::Horizontal)
    } else if a % 3 == b % 3 && b % 3 == c % 3 {
        Some(LineKind::Vertical)
    } else if line.contains(&0) && line.contains(&8) && line.contains(&4) {
        Some(LineKind::DiagonalMain)
    } else if line.contains(&2) && line.contains(&6) && line.contains(&4) {
        Some(LineKind::DiagonalAnti)
    } else {
        None
    }
}

/// First line in enumeration order held entirely by one player.
#[instrument(level = "trace", skip(board))]
pub fn winning_line(board: &Board) -> Option<(Player, Line)> {
    let cells = board.cells();
    for line in LINES {
        let [a, b, c] = line;
        if let Cell::Occupied(player) = cells[a] {
            if cells[b] == cells[a] && cells[c] == cells[a] {
                return Some((player, line));
            }
        }
    }
    None
}

/// Checks if there is a winner on the board.
pub fn check_winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|(player, _)| player)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board: Board = "XXX OO. ...".parse().unwrap();
        assert_eq!(winning_line(&board), Some((Player::X, [0, 1, 2])));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board: Board = "XXO XO. O..".parse().unwrap();
        assert_eq!(winning_line(&board), Some((Player::O, [2, 4, 6])));
    }

    #[test]
    fn test_first_line_in_enumeration_order_wins() {
        // Column 0 and the main diagonal are both complete.
        let board: Board = "XOO XX. XOX".parse().unwrap();
        assert_eq!(winning_line(&board), Some((Player::X, [0, 3, 6])));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board: Board = "XX. ... ...".parse().unwrap();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_classify_every_line() {
        let kinds: Vec<_> = LINES.iter().map(|l| classify_line(*l)).collect();
        assert_eq!(
            kinds,
            vec![
                Some(LineKind::Horizontal),
                Some(LineKind::Horizontal),
                Some(LineKind::Horizontal),
                Some(LineKind::Vertical),
                Some(LineKind::Vertical),
                Some(LineKind::Vertical),
                Some(LineKind::DiagonalMain),
                Some(LineKind::DiagonalAnti),
            ]
        );
    }

    #[test]
    fn test_classify_rejects_non_line() {
        assert_eq!(classify_line([0, 1, 5]), None);
    }
}
