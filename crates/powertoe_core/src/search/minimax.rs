//! Minimax over a single reused board buffer.
//!
//! Both variants iterate empty cells in ascending order and keep the first
//! strictly better score, so pruning never changes the chosen root move.

use crate::rules::{GameResult, evaluate};
use crate::{Board, CELL_COUNT, Player};
use derive_getters::Getters;
use tracing::{instrument, trace};

const WIN_SCORE: i32 = 10;
const INFINITY: i32 = 1_000;

/// Score and move chosen at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct SearchOutcome {
    /// Root score from the AI's perspective.
    score: i32,
    /// Chosen cell, `None` on a terminal root.
    index: Option<usize>,
    /// Positions visited.
    nodes: u64,
}

/// Searcher state for one root position.
#[derive(Debug)]
struct Minimax {
    ai: Player,
    nodes: u64,
}

impl Minimax {
    fn new(ai: Player) -> Self {
        Self { ai, nodes: 0 }
    }

    /// Leaf score, or `None` when the game is still open.
    fn terminal_score(&self, board: &Board, depth: i32) -> Option<i32> {
        match evaluate(board) {
            GameResult::Win { player, .. } if player == self.ai => Some(WIN_SCORE - depth),
            GameResult::Win { .. } => Some(depth - WIN_SCORE),
            GameResult::Draw => Some(0),
            GameResult::InProgress => None,
        }
    }

    fn mover(&self, maximizing: bool) -> Player {
        if maximizing { self.ai } else { self.ai.opponent() }
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<usize>) {
        self.nodes += 1;
        if let Some(score) = self.terminal_score(board, depth) {
            return (score, None);
        }

        let player = self.mover(maximizing);
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for index in 0..CELL_COUNT {
            if !board.is_empty(index) {
                continue;
            }
            board.make(index, player);
            let (score, _) = self.alpha_beta(board, depth + 1, !maximizing, alpha, beta);
            board.unmake(index);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(index);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(index);
                }
                beta = beta.min(best_score);
            }
            if beta <= alpha {
                break;
            }
        }

        (best_score, best_move)
    }

    fn exhaustive(&mut self, board: &mut Board, depth: i32, maximizing: bool) -> (i32, Option<usize>) {
        self.nodes += 1;
        if let Some(score) = self.terminal_score(board, depth) {
            return (score, None);
        }

        let player = self.mover(maximizing);
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for index in 0..CELL_COUNT {
            if !board.is_empty(index) {
                continue;
            }
            board.make(index, player);
            let (score, _) = self.exhaustive(board, depth + 1, !maximizing);
            board.unmake(index);

            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if better {
                best_score = score;
                best_move = Some(index);
            }
        }

        (best_score, best_move)
    }
}

/// Best move for `ai` (to move on `board`) using alpha-beta pruning.
#[instrument(level = "debug", skip(board), fields(empty = board.empty_cells().len()))]
pub fn minimax(board: &Board, ai: Player) -> SearchOutcome {
    let mut buffer = *board;
    let mut search = Minimax::new(ai);
    let (score, index) = search.alpha_beta(&mut buffer, 0, true, -INFINITY, INFINITY);
    debug_assert_eq!(buffer, *board, "search must restore its buffer");
    trace!(score, ?index, nodes = search.nodes, "Alpha-beta finished");
    SearchOutcome {
        score,
        index,
        nodes: search.nodes,
    }
}

/// Reference minimax without pruning.
#[instrument(level = "debug", skip(board))]
pub fn minimax_unpruned(board: &Board, ai: Player) -> SearchOutcome {
    let mut buffer = *board;
    let mut search = Minimax::new(ai);
    let (score, index) = search.exhaustive(&mut buffer, 0, true);
    SearchOutcome {
        score,
        index,
        nodes: search.nodes,
    }
}
