//! AI move selection.
//!
//! [`Searcher::select_move`] runs an exact alpha-beta search (with a small
//! opening book for the first two plies) and then lets the
//! [`DifficultyPolicy`] degrade the result for weaker tiers.

pub mod difficulty;
pub mod minimax;

pub use difficulty::{Difficulty, DifficultyPolicy};
pub use minimax::{SearchOutcome, minimax, minimax_unpruned};

use crate::rules::evaluate;
use crate::{Board, Cell, Player};
use derive_more::{Display, Error};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];
const FIRST_MOVES: [usize; 5] = [CENTER, 0, 2, 6, 8];

/// Misuse of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SearchError {
    /// The board is already won or full.
    #[display("Search invoked on a terminal board")]
    TerminalBoard,
}

/// The move the exact search would play, using the opening book on an empty
/// board and against an opponent's centre opening.
///
/// Returns `None` on a terminal board.
#[instrument(level = "debug", skip(board, rng))]
pub fn best_move<R: Rng + ?Sized>(board: &Board, ai: Player, rng: &mut R) -> Option<usize> {
    if evaluate(board).is_terminal() {
        return None;
    }
    match board.empty_cells().len() {
        9 => FIRST_MOVES.choose(rng).copied(),
        8 if board.get(CENTER) == Ok(Cell::Occupied(ai.opponent())) => {
            CORNERS.choose(rng).copied()
        }
        _ => *minimax(board, ai).index(),
    }
}

/// Chooses AI moves under a difficulty policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Searcher {
    policy: DifficultyPolicy,
}

impl Searcher {
    /// Creates a searcher with the given policy.
    pub fn new(policy: DifficultyPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy.
    pub fn policy(&self) -> &DifficultyPolicy {
        &self.policy
    }

    /// Picks the cell `ai` plays on `board`.
    ///
    /// Calling this on a finished board is a caller bug: it trips a debug
    /// assertion and returns [`SearchError::TerminalBoard`] in release builds.
    #[instrument(skip(self, board, rng), fields(empty = board.empty_cells().len()))]
    pub fn select_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        ai: Player,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<usize, SearchError> {
        let terminal = evaluate(board).is_terminal();
        debug_assert!(!terminal, "select_move called on a terminal board");
        if terminal {
            return Err(SearchError::TerminalBoard);
        }

        let best = if difficulty.uses_search() {
            Some(best_move(board, ai, rng).ok_or(SearchError::TerminalBoard)?)
        } else {
            None
        };
        let chosen = self
            .policy
            .choose(difficulty, board, ai, best, rng)
            .ok_or(SearchError::TerminalBoard)?;
        match best {
            Some(best) => debug!(%ai, %difficulty, best, chosen, "AI move selected"),
            None => debug!(%ai, %difficulty, chosen, "AI move picked at random"),
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_opening_book_first_move() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let mv = best_move(&Board::new(), Player::X, &mut rng).unwrap();
            assert!(FIRST_MOVES.contains(&mv));
        }
    }

    #[test]
    fn test_opening_book_answers_center_with_corner() {
        let board: Board = "... .X. ...".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let mv = best_move(&board, Player::O, &mut rng).unwrap();
            assert!(CORNERS.contains(&mv));
        }
    }

    #[test]
    fn test_own_centre_is_not_answered_from_the_book() {
        // O already holds the centre; the book only answers X's centre.
        let board: Board = "... .O. ...".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(best_move(&board, Player::O, &mut rng), Some(0));
        }
    }

    #[test]
    fn test_second_ply_off_center_uses_search() {
        // X opened in a corner; the only non-losing reply is the center.
        let board: Board = "X.. ... ...".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(best_move(&board, Player::O, &mut rng), Some(CENTER));
    }

    #[test]
    fn test_select_move_rejects_terminal_board_in_release() {
        if cfg!(debug_assertions) {
            return;
        }
        let board: Board = "XOX OXO OXO".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Searcher::default().select_move(&board, Player::O, Difficulty::Hard, &mut rng),
            Err(SearchError::TerminalBoard)
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "terminal board")]
    fn test_select_move_on_terminal_board_panics_in_debug() {
        let board: Board = "XXX OO. ...".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let _ = Searcher::default().select_move(&board, Player::O, Difficulty::Hard, &mut rng);
    }

    #[test]
    fn test_easy_select_move_draws_from_every_legal_cell() {
        // Any search would pin the block on 2; Easy never consults it.
        let board: Board = "XX. .O. ...".parse().unwrap();
        let searcher = Searcher::new(DifficultyPolicy::flawless());
        let mut rng = StdRng::seed_from_u64(13);
        let picks: Vec<usize> = (0..300)
            .map(|_| {
                searcher
                    .select_move(&board, Player::O, Difficulty::Easy, &mut rng)
                    .unwrap()
            })
            .collect();
        for index in board.empty_cells() {
            assert!(picks.contains(&index), "cell {index} never picked");
        }
    }

    #[test]
    fn test_select_move_is_legal_for_every_tier() {
        let board: Board = "XO. .X. ..O".parse().unwrap();
        let searcher = Searcher::default();
        let mut rng = StdRng::seed_from_u64(21);
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Nightmare,
        ] {
            for _ in 0..20 {
                let mv = searcher
                    .select_move(&board, Player::O, difficulty, &mut rng)
                    .unwrap();
                assert!(board.is_empty(mv));
            }
        }
    }
}
