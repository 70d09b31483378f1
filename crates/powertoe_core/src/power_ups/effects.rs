//! Board effects of targeted power-ups.

use crate::{Board, BoardError, CELL_COUNT, Cell, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Cells protected from Steal and Bomb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShieldSet {
    cells: [bool; CELL_COUNT],
}

impl ShieldSet {
    /// No shields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if `index` is shielded. Out-of-range indices never are.
    pub fn contains(&self, index: usize) -> bool {
        self.cells.get(index).copied().unwrap_or(false)
    }

    /// Shields `index`. Returns false if it was already shielded.
    pub fn insert(&mut self, index: usize) -> Result<bool, BoardError> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(BoardError::InvalidIndex(index))?;
        let fresh = !*cell;
        *cell = true;
        Ok(fresh)
    }

    /// Shielded indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.cells[i]).collect()
    }
}

/// Why a power-up resolved without changing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoEffectReason {
    /// Steal target is empty.
    EmptyTarget,
    /// Steal target already holds the acting player's mark.
    OwnMark,
    /// Target is shielded.
    ShieldedTarget,
    /// Shield target was already shielded.
    AlreadyShielded,
    /// Time Warp with no placements to undo.
    NothingToUndo,
}

/// What a resolved power-up did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectSummary {
    /// Opponent will skip `turns` turns.
    Frozen {
        /// The frozen player.
        opponent: Player,
        /// Turns they will skip.
        turns: u32,
    },
    /// The acting player places twice this turn.
    DoubleMoveArmed,
    /// Target converted to the acting player.
    Stolen {
        /// Converted cell.
        index: usize,
    },
    /// Cells emptied by a bomb.
    Bombed {
        /// Every unshielded cell in the blast area.
        cleared: Vec<usize>,
        /// Shielded cells the blast skipped.
        spared: Vec<usize>,
    },
    /// Target now shielded.
    Shielded {
        /// Shielded cell.
        index: usize,
    },
    /// Board rolled back.
    TimeWarped {
        /// Placements undone.
        undone: usize,
    },
    /// Activation was spent but the board is unchanged.
    NoEffect(NoEffectReason),
}

impl EffectSummary {
    /// Whether the board may have changed.
    pub fn touches_board(&self) -> bool {
        matches!(
            self,
            EffectSummary::Stolen { .. }
                | EffectSummary::Bombed { .. }
                | EffectSummary::TimeWarped { .. }
        )
    }
}

/// Blast area of a bomb centred on `center`: the centre first, then its
/// in-bounds neighbours in ascending order.
pub fn bomb_area(center: usize) -> Vec<usize> {
    let row = center / 3;
    let col = center % 3;
    let mut cells = vec![center];
    for r in row.saturating_sub(1)..=(row + 1).min(2) {
        for c in col.saturating_sub(1)..=(col + 1).min(2) {
            let cell = r * 3 + c;
            if cell != center {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Converts an unshielded opponent mark at `index` to `player`.
#[instrument(skip(board, shields))]
pub fn steal(
    board: &mut Board,
    shields: &ShieldSet,
    index: usize,
    player: Player,
) -> Result<EffectSummary, BoardError> {
    let target = board.get(index)?;
    if shields.contains(index) {
        debug!("Steal blocked by shield");
        return Ok(EffectSummary::NoEffect(NoEffectReason::ShieldedTarget));
    }
    match target {
        Cell::Empty => Ok(EffectSummary::NoEffect(NoEffectReason::EmptyTarget)),
        Cell::Occupied(owner) if owner == player => {
            Ok(EffectSummary::NoEffect(NoEffectReason::OwnMark))
        }
        Cell::Occupied(_) => {
            board.convert(index, player)?;
            Ok(EffectSummary::Stolen { index })
        }
    }
}

/// Clears the blast area around `center`, skipping shielded cells.
#[instrument(skip(board, shields))]
pub fn bomb(
    board: &mut Board,
    shields: &ShieldSet,
    center: usize,
) -> Result<EffectSummary, BoardError> {
    board.get(center)?;
    let (spared, cleared): (Vec<usize>, Vec<usize>) = bomb_area(center)
        .into_iter()
        .partition(|&i| shields.contains(i));
    for &index in &cleared {
        board.clear(index)?;
    }
    debug!(?cleared, ?spared, "Bomb resolved");
    Ok(EffectSummary::Bombed { cleared, spared })
}

/// Shields `index`.
#[instrument(skip(shields))]
pub fn shield(shields: &mut ShieldSet, index: usize) -> Result<EffectSummary, BoardError> {
    if shields.insert(index)? {
        Ok(EffectSummary::Shielded { index })
    } else {
        Ok(EffectSummary::NoEffect(NoEffectReason::AlreadyShielded))
    }
}
