//! Core domain types: players, cells and the 3x3 board.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Player mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Player {
    /// Player X (always moves first).
    #[display("X")]
    X,
    /// Player O.
    #[display("O")]
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Both players in turn order.
    pub const BOTH: [Player; 2] = [Player::X, Player::O];
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell holds a player's mark.
    Occupied(Player),
}

impl Cell {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    /// Returns true for an empty cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Errors raised by board mutations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Index outside 0-8.
    #[display("Cell index {} is out of bounds (must be 0-8)", _0)]
    InvalidIndex(#[error(not(source))] usize),
    /// Placement on a non-empty cell.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(#[error(not(source))] usize),
    /// Steal target does not hold the opponent's mark.
    #[display("Cell {} does not hold an opposing mark", _0)]
    NotConvertible(#[error(not(source))] usize),
    /// Board text could not be parsed.
    #[display("Malformed board pattern: {}", _0)]
    MalformedPattern(#[error(not(source))] String),
}

/// 3x3 board, cells in row-major order (index = row * 3 + column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from raw cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    fn check_index(index: usize) -> Result<(), BoardError> {
        if index < CELL_COUNT {
            Ok(())
        } else {
            Err(BoardError::InvalidIndex(index))
        }
    }

    /// Returns the cell at `index`.
    pub fn get(&self, index: usize) -> Result<Cell, BoardError> {
        Self::check_index(index)?;
        Ok(self.cells[index])
    }

    /// Places `player` on an empty cell.
    #[instrument(level = "trace", skip(self))]
    pub fn set(&mut self, index: usize, player: Player) -> Result<(), BoardError> {
        Self::check_index(index)?;
        if !self.cells[index].is_empty() {
            return Err(BoardError::CellOccupied(index));
        }
        self.cells[index] = Cell::Occupied(player);
        Ok(())
    }

    /// Empties a cell whatever it holds.
    #[instrument(level = "trace", skip(self))]
    pub fn clear(&mut self, index: usize) -> Result<(), BoardError> {
        Self::check_index(index)?;
        self.cells[index] = Cell::Empty;
        Ok(())
    }

    /// Flips an opponent-held cell to `player`.
    ///
    /// This is the only mutation allowed to replace one mark with the other.
    #[instrument(level = "trace", skip(self))]
    pub fn convert(&mut self, index: usize, player: Player) -> Result<(), BoardError> {
        Self::check_index(index)?;
        if self.cells[index] != Cell::Occupied(player.opponent()) {
            return Err(BoardError::NotConvertible(index));
        }
        self.cells[index] = Cell::Occupied(player);
        Ok(())
    }

    /// Search-only placement on a cell known to be empty.
    pub(crate) fn make(&mut self, index: usize, player: Player) {
        debug_assert!(self.cells[index].is_empty(), "make on occupied cell {index}");
        self.cells[index] = Cell::Occupied(player);
    }

    /// Reverts [`Board::make`].
    pub(crate) fn unmake(&mut self, index: usize) {
        self.cells[index] = Cell::Empty;
    }

    /// Checks if a cell is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Ok(Cell::Empty))
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Indices of empty cells in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.cells[i].is_empty()).collect()
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Number of cells held by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Occupied(player))
            .count()
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                match self.cells[index] {
                    Cell::Empty => write!(f, "{}", index + 1)?,
                    Cell::Occupied(player) => write!(f, "{}", player)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Parses nine cell characters: `X`, `O`, and `.`, `_` or `-` for empty.
/// Whitespace and `|` separators are ignored.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Cell::Empty; CELL_COUNT];
        let mut filled = 0;
        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            if filled == CELL_COUNT {
                return Err(BoardError::MalformedPattern(s.to_string()));
            }
            cells[filled] = match ch {
                'X' | 'x' => Cell::Occupied(Player::X),
                'O' | 'o' => Cell::Occupied(Player::O),
                '.' | '_' | '-' => Cell::Empty,
                _ => return Err(BoardError::MalformedPattern(s.to_string())),
            };
            filled += 1;
        }
        if filled != CELL_COUNT {
            return Err(BoardError::MalformedPattern(s.to_string()));
        }
        Ok(Self { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut board = Board::new();
        assert_eq!(board.set(9, Player::X), Err(BoardError::InvalidIndex(9)));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_set_rejects_occupied() {
        let mut board = Board::new();
        board.set(4, Player::X).unwrap();
        assert_eq!(board.set(4, Player::O), Err(BoardError::CellOccupied(4)));
        assert_eq!(board.get(4), Ok(Cell::Occupied(Player::X)));
    }

    #[test]
    fn test_clear_ignores_occupant() {
        let mut board: Board = "XO. ... ...".parse().unwrap();
        board.clear(0).unwrap();
        board.clear(2).unwrap();
        assert!(board.is_empty(0));
        assert!(board.is_empty(2));
        assert_eq!(board.get(1), Ok(Cell::Occupied(Player::O)));
        assert_eq!(board.clear(11), Err(BoardError::InvalidIndex(11)));
    }

    #[test]
    fn test_convert_only_flips_opponent() {
        let mut board: Board = "XO. ... ...".parse().unwrap();
        assert_eq!(board.convert(0, Player::X), Err(BoardError::NotConvertible(0)));
        assert_eq!(board.convert(2, Player::X), Err(BoardError::NotConvertible(2)));
        board.convert(1, Player::X).unwrap();
        assert_eq!(board.count(Player::X), 2);
        assert_eq!(board.count(Player::O), 0);
    }

    #[test]
    fn test_display_numbers_empty_cells() {
        let board: Board = "X.. .O. ...".parse().unwrap();
        assert_eq!(board.to_string(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            "XO".parse::<Board>(),
            Err(BoardError::MalformedPattern(_))
        ));
        assert!(matches!(
            "XOXOXOXOXO".parse::<Board>(),
            Err(BoardError::MalformedPattern(_))
        ));
    }

    #[test]
    fn test_empty_cells_ascending() {
        let board: Board = "X.O .X. O..".parse().unwrap();
        assert_eq!(board.empty_cells(), vec![1, 3, 5, 7, 8]);
        assert_eq!(board.occupied(), 4);
    }
}
