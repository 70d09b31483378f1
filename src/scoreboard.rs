//! Running statistics fed by finished games.

use derive_getters::Getters;
use powertoe_core::rules::classify_line;
use powertoe_core::{
    Board, CELL_COUNT, Difficulty, GameObserver, GameResult, GameSummary, LineKind, Player,
    PowerUpKind,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

/// Games against the AI, counted from the human's side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize)]
pub struct AiRecord {
    played: u32,
    won: u32,
    lost: u32,
    drawn: u32,
}

impl AiRecord {
    /// Human win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        percentage(self.won, self.played)
    }
}

/// Played and won against one difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize)]
pub struct TierRecord {
    played: u32,
    won: u32,
}

/// Consecutive human wins against the AI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize)]
pub struct Streak {
    current: u32,
    longest: u32,
}

impl Streak {
    fn extend(&mut self) {
        self.current += 1;
        self.longest = self.longest.max(self.current);
    }

    fn break_off(&mut self) {
        self.current = 0;
    }
}

/// Aggregated results over many games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize)]
pub struct Scoreboard {
    games: u32,
    x_wins: u32,
    o_wins: u32,
    draws: u32,
    total_moves: u64,
    total_time: Duration,
    vs_ai: AiRecord,
    local_games: u32,
    by_difficulty: BTreeMap<String, TierRecord>,
    streak: Streak,
    power_ups_used: BTreeMap<String, u32>,
    wins_by_line: BTreeMap<String, u32>,
    favorite_positions: [u32; CELL_COUNT],
}

impl Scoreboard {
    /// Empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one finished game.
    #[instrument(skip(self, summary), fields(result = %summary.result()))]
    pub fn record(&mut self, summary: &GameSummary) {
        self.games += 1;
        self.total_moves += *summary.move_count() as u64;
        self.total_time += *summary.elapsed();
        match summary.result() {
            GameResult::Win { player, line } => {
                match player {
                    Player::X => self.x_wins += 1,
                    Player::O => self.o_wins += 1,
                }
                if let Some(kind) = classify_line(*line) {
                    *self.wins_by_line.entry(line_name(kind)).or_default() += 1;
                }
            }
            GameResult::Draw => self.draws += 1,
            GameResult::InProgress => {
                warn!("Recorded a game that had not finished");
            }
        }

        match summary.opponent() {
            Some(ai) => self.record_against_ai(*ai.player(), *ai.difficulty(), summary.result()),
            None => self.local_games += 1,
        }

        for used in summary.power_ups_used() {
            *self.power_ups_used.entry(used.kind.to_string()).or_default() += 1;
        }
        debug!(
            games = self.games,
            streak = self.streak.current,
            "Game recorded"
        );
    }

    fn record_against_ai(&mut self, ai: Player, difficulty: Difficulty, result: &GameResult) {
        let tier = self.by_difficulty.entry(difficulty.to_string()).or_default();
        tier.played += 1;
        self.vs_ai.played += 1;
        match result.winner() {
            Some(winner) if winner == ai => {
                self.vs_ai.lost += 1;
                self.streak.break_off();
            }
            Some(_) => {
                tier.won += 1;
                self.vs_ai.won += 1;
                self.streak.extend();
            }
            None => self.vs_ai.drawn += 1,
        }
    }

    /// Counts a placement at `index` for the heat map.
    pub fn record_placement(&mut self, index: usize) {
        match self.favorite_positions.get_mut(index) {
            Some(count) => *count += 1,
            None => warn!(index, "Placement outside the board"),
        }
    }

    /// Wins by `player`.
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x_wins,
            Player::O => self.o_wins,
        }
    }

    /// Win rate of `player` as a percentage (0.0-100.0).
    pub fn win_rate(&self, player: Player) -> f64 {
        percentage(self.wins(player), self.games)
    }

    /// Average placements per game.
    pub fn average_moves(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games as f64
        }
    }

    /// Average wall-clock length of a game.
    pub fn average_time(&self) -> Duration {
        if self.games == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.games
        }
    }

    /// Record against `difficulty`.
    pub fn tier(&self, difficulty: Difficulty) -> TierRecord {
        self.by_difficulty
            .get(&difficulty.to_string())
            .copied()
            .unwrap_or_default()
    }

    /// Uses of `kind`.
    pub fn uses_of(&self, kind: PowerUpKind) -> u32 {
        self.power_ups_used
            .get(&kind.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// The most played cell, lowest index on ties. `None` before any placement.
    pub fn favorite_position(&self) -> Option<usize> {
        let (index, count) = self
            .favorite_positions
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, count)| **count)?;
        (*count > 0).then_some(index)
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

fn line_name(kind: LineKind) -> String {
    match kind {
        LineKind::Horizontal => "horizontal",
        LineKind::Vertical => "vertical",
        LineKind::DiagonalMain => "diagonal",
        LineKind::DiagonalAnti => "anti-diagonal",
    }
    .to_string()
}

impl std::fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Games played: {}", self.games)?;
        writeln!(
            f,
            "X wins: {} ({:.1}%)",
            self.x_wins,
            self.win_rate(Player::X)
        )?;
        writeln!(
            f,
            "O wins: {} ({:.1}%)",
            self.o_wins,
            self.win_rate(Player::O)
        )?;
        writeln!(f, "Draws: {}", self.draws)?;
        writeln!(f, "Average moves: {:.2}", self.average_moves())?;
        write!(f, "Average time: {:.1}s", self.average_time().as_secs_f64())?;
        if self.vs_ai.played > 0 {
            write!(
                f,
                "\nVs AI: {} won, {} lost, {} drawn ({:.1}%), streak {} (best {})",
                self.vs_ai.won,
                self.vs_ai.lost,
                self.vs_ai.drawn,
                self.vs_ai.win_rate(),
                self.streak.current,
                self.streak.longest
            )?;
            for difficulty in Difficulty::iter() {
                let tier = self.tier(difficulty);
                if tier.played > 0 {
                    write!(f, "\n  {}: {}/{} won", difficulty, tier.won, tier.played)?;
                }
            }
        }
        if self.local_games > 0 {
            write!(f, "\nLocal games: {}", self.local_games)?;
        }
        for kind in LineKind::iter() {
            let name = line_name(kind);
            if let Some(count) = self.wins_by_line.get(&name) {
                write!(f, "\n  {} wins: {}", name, count)?;
            }
        }
        for (name, count) in &self.power_ups_used {
            write!(f, "\n  {} used: {}", name, count)?;
        }
        if let Some(index) = self.favorite_position() {
            write!(f, "\nFavorite cell: {}", index + 1)?;
        }
        Ok(())
    }
}

/// Session observer that records placements and finished games into a
/// shared scoreboard.
#[derive(Debug, Clone, Default)]
pub struct ScoreboardObserver {
    scoreboard: Arc<Mutex<Scoreboard>>,
}

impl ScoreboardObserver {
    /// Creates an observer over a fresh scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the scoreboard.
    pub fn scoreboard(&self) -> Arc<Mutex<Scoreboard>> {
        Arc::clone(&self.scoreboard)
    }

    /// Copy of the current totals.
    pub fn snapshot(&self) -> Scoreboard {
        match self.scoreboard.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Scoreboard)) {
        match self.scoreboard.lock() {
            Ok(mut scoreboard) => f(&mut scoreboard),
            Err(poisoned) => {
                warn!("Scoreboard lock poisoned, recovering");
                f(&mut poisoned.into_inner());
            }
        }
    }
}

impl GameObserver for ScoreboardObserver {
    fn on_move_applied(&mut self, _board: &Board, _player: Player, index: usize) {
        self.update(|scoreboard| scoreboard.record_placement(index));
    }

    fn on_game_ended(&mut self, summary: &GameSummary) {
        self.update(|scoreboard| scoreboard.record(summary));
    }
}
