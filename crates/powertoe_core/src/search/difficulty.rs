//! Difficulty tiers: stochastic degradation of the exact search result.

use super::minimax::minimax;
use crate::rules::{GameResult, evaluate};
use crate::{Board, Player};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// AI strength.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniform random legal moves.
    Easy,
    /// Mostly optimal, often random.
    #[default]
    Medium,
    /// Optimal with rare random slips.
    Hard,
    /// Optimal with very rare slips to a different move.
    Nightmare,
}

impl Difficulty {
    /// Easy never consults the search.
    pub fn uses_search(self) -> bool {
        !matches!(self, Difficulty::Easy)
    }
}

/// Probability of playing the searched move, per tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyPolicy {
    /// Medium accuracy.
    pub medium_accuracy: f64,
    /// Hard accuracy.
    pub hard_accuracy: f64,
    /// Nightmare accuracy.
    pub nightmare_accuracy: f64,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self {
            medium_accuracy: 0.7,
            hard_accuracy: 0.9,
            nightmare_accuracy: 0.99,
        }
    }
}

impl DifficultyPolicy {
    /// A policy where every searching tier always plays the searched move.
    pub fn flawless() -> Self {
        Self {
            medium_accuracy: 1.0,
            hard_accuracy: 1.0,
            nightmare_accuracy: 1.0,
        }
    }

    /// Maps the searched move to the move actually played on `board`.
    ///
    /// `best` is the search result, `None` when no search ran (Easy). A
    /// Nightmare miss only considers moves whose game-theoretic outcome for
    /// `ai` (win, draw or loss) matches `best`'s, so it never turns a drawn
    /// position into a lost one.
    #[instrument(level = "debug", skip(self, board, rng))]
    pub fn choose<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        board: &Board,
        ai: Player,
        best: Option<usize>,
        rng: &mut R,
    ) -> Option<usize> {
        let legal = board.empty_cells();
        let random = |rng: &mut R| legal.choose(rng).copied();
        let Some(best) = best else {
            return random(rng);
        };
        debug_assert!(legal.contains(&best), "best move {best} is not legal");

        let chosen = match difficulty {
            Difficulty::Easy => random(rng).unwrap_or(best),
            Difficulty::Medium => {
                if rng.gen_bool(clamp(self.medium_accuracy)) {
                    best
                } else {
                    random(rng).unwrap_or(best)
                }
            }
            Difficulty::Hard => {
                if rng.gen_bool(clamp(self.hard_accuracy)) {
                    best
                } else {
                    random(rng).unwrap_or(best)
                }
            }
            Difficulty::Nightmare => {
                if rng.gen_bool(clamp(self.nightmare_accuracy)) {
                    best
                } else {
                    equivalent_alternatives(board, ai, best)
                        .choose(rng)
                        .copied()
                        .unwrap_or(best)
                }
            }
        };

        if chosen != best {
            debug!(%difficulty, best, chosen, "Difficulty policy deviated from search");
        }
        Some(chosen)
    }
}

/// Outcome of `ai` playing `index` under perfect play afterwards: 1 win, 0 draw, -1 loss.
fn outcome_class(board: &Board, ai: Player, index: usize) -> i32 {
    let mut next = *board;
    next.make(index, ai);
    match evaluate(&next) {
        GameResult::Win { player, .. } if player == ai => 1,
        GameResult::Win { .. } => -1,
        GameResult::Draw => 0,
        GameResult::InProgress => -minimax(&next, ai.opponent()).score().signum(),
    }
}

/// Legal moves other than `best` that keep `best`'s outcome class.
fn equivalent_alternatives(board: &Board, ai: Player, best: usize) -> Vec<usize> {
    let target = outcome_class(board, ai, best);
    let alternatives: Vec<usize> = board
        .empty_cells()
        .into_iter()
        .filter(|&index| index != best && outcome_class(board, ai, index) >= target)
        .collect();
    trace!(best, target, ?alternatives, "Nightmare alternatives");
    alternatives
}

fn clamp(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
