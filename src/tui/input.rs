//! Key bindings and cursor movement.

use crossterm::event::KeyCode;
use powertoe_core::{Position, PowerUpKind};

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Place a mark, or target the armed power-up, at this cell.
    Select(usize),
    /// Activate a power-up.
    Power(PowerUpKind),
    /// Start over.
    Reset,
    /// Leave the game.
    Quit,
}

/// Power-up hotkeys.
pub const POWER_KEYS: [(char, PowerUpKind); 6] = [
    ('f', PowerUpKind::Freeze),
    ('d', PowerUpKind::DoubleMove),
    ('s', PowerUpKind::Steal),
    ('b', PowerUpKind::Bomb),
    ('h', PowerUpKind::Shield),
    ('t', PowerUpKind::TimeWarp),
];

/// Hotkey bound to `kind`.
pub fn power_key(kind: PowerUpKind) -> char {
    POWER_KEYS
        .iter()
        .find(|(_, bound)| *bound == kind)
        .map(|(key, _)| *key)
        .unwrap_or('?')
}

/// Moves cursor based on arrow keys, stopping at the board edge.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, column) = (cursor.row(), cursor.column());
    let (row, column) = match key {
        KeyCode::Up => (row.saturating_sub(1), column),
        KeyCode::Down => ((row + 1).min(2), column),
        KeyCode::Left => (row, column.saturating_sub(1)),
        KeyCode::Right => (row, (column + 1).min(2)),
        _ => return cursor,
    };
    Position::from_index(row * 3 + column).unwrap_or(cursor)
}

/// Maps a non-arrow key to an action; the cursor supplies the cell for Enter and Space.
pub fn action_for(key: KeyCode, cursor: Position) -> Option<Action> {
    match key {
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Select(cursor.to_index())),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) => {
            let c = c.to_ascii_lowercase();
            if let Some(digit) = c.to_digit(10) {
                return Position::from_label_or_number(&digit.to_string())
                    .map(|position| Action::Select(position.to_index()));
            }
            match c {
                'q' => Some(Action::Quit),
                'r' => Some(Action::Reset),
                _ => POWER_KEYS
                    .iter()
                    .find(|(key, _)| *key == c)
                    .map(|(_, kind)| Action::Power(*kind)),
            }
        }
        _ => None,
    }
}
