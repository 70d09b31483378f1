//! AI-versus-AI matches.

use crate::config::AppConfig;
use crate::scoreboard::{Scoreboard, ScoreboardObserver};
use derive_new::new;
use powertoe_core::{Difficulty, GameSession, Player, SessionError, SessionPhase, Searcher};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Match settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Matchup {
    /// Games to play.
    pub games: u32,
    /// X's tier.
    pub x: Difficulty,
    /// O's tier.
    pub o: Difficulty,
}

impl Matchup {
    fn difficulty(&self, player: Player) -> Difficulty {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }
}

/// Plays `matchup.games` games and returns the totals.
///
/// Both sides are driven through an ordinary two-player session so every
/// placement goes through the same rules as interactive play.
#[instrument(skip(config, rng))]
pub fn run<R: Rng + ?Sized>(
    matchup: Matchup,
    config: &AppConfig,
    rng: &mut R,
) -> Result<Scoreboard, SessionError> {
    let observer = ScoreboardObserver::new();
    let mut session =
        GameSession::new(config.session_config(true)).with_observer(Box::new(observer.clone()));
    let searcher = Searcher::new(*config.ai().policy());

    for game in 0..matchup.games {
        play_one(&mut session, &searcher, matchup, rng)?;
        debug!(game, phase = %session.phase(), "Game finished");
        session.reset();
    }

    let scoreboard = observer.snapshot();
    info!(
        games = matchup.games,
        x_wins = scoreboard.x_wins(),
        o_wins = scoreboard.o_wins(),
        draws = scoreboard.draws(),
        "Simulation complete"
    );
    Ok(scoreboard)
}

fn play_one<R: Rng + ?Sized>(
    session: &mut GameSession,
    searcher: &Searcher,
    matchup: Matchup,
    rng: &mut R,
) -> Result<(), SessionError> {
    while let SessionPhase::AwaitingMove(player) = session.phase() {
        let index =
            searcher.select_move(session.board(), player, matchup.difficulty(player), rng)?;
        session.apply_placement(index)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use powertoe_core::DifficultyPolicy;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_every_game_is_recorded() {
        let mut rng = StdRng::seed_from_u64(1);
        let scoreboard = run(
            Matchup::new(25, Difficulty::Easy, Difficulty::Medium),
            &AppConfig::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(*scoreboard.games(), 25);
        assert_eq!(
            scoreboard.x_wins() + scoreboard.o_wins() + scoreboard.draws(),
            25
        );
    }

    #[test]
    fn test_perfect_play_always_draws() {
        let config = AppConfig::from_toml("[ai]\nnightmare_accuracy = 1.0").unwrap();
        assert_eq!(
            config.ai().policy().nightmare_accuracy,
            DifficultyPolicy::flawless().nightmare_accuracy
        );
        let mut rng = StdRng::seed_from_u64(9);
        let scoreboard = run(
            Matchup::new(10, Difficulty::Nightmare, Difficulty::Nightmare),
            &config,
            &mut rng,
        )
        .unwrap();
        assert_eq!(*scoreboard.draws(), 10);
    }
}
