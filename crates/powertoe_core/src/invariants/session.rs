//! Session invariants.

use super::Invariant;
use crate::rules::{GameResult, evaluate};
use crate::session::{GameSession, SessionPhase};
use crate::Player;

/// A power-up is available exactly when its cooldown is zero.
pub struct CooldownConsistent;

impl Invariant<GameSession> for CooldownConsistent {
    fn holds(session: &GameSession) -> bool {
        Player::BOTH.iter().all(|&player| {
            session
                .power_ups(player)
                .iter()
                .all(|(_, slot)| *slot.available() == (*slot.cooldown() == 0))
        })
    }

    fn description() -> &'static str {
        "Power-up availability matches its cooldown"
    }
}

/// The phase is terminal exactly when the board is won or full, with the
/// same result.
pub struct PhaseMatchesBoard;

impl Invariant<GameSession> for PhaseMatchesBoard {
    fn holds(session: &GameSession) -> bool {
        let result = evaluate(session.board());
        match session.phase() {
            SessionPhase::Terminal(recorded) => recorded == result,
            SessionPhase::AwaitingMove(_) | SessionPhase::AwaitingPowerUpTarget(..) => {
                result == GameResult::InProgress
            }
        }
    }

    fn description() -> &'static str {
        "Session phase agrees with the board"
    }
}

/// A pending freeze never targets the player currently acting, and nothing
/// is pending once the game is over.
pub struct FreezeTargetsIdlePlayer;

impl Invariant<GameSession> for FreezeTargetsIdlePlayer {
    fn holds(session: &GameSession) -> bool {
        match (session.freeze(), session.phase().active_player()) {
            (None, _) => true,
            (Some(freeze), Some(active)) => freeze.player != active && freeze.turns > 0,
            (Some(_), None) => false,
        }
    }

    fn description() -> &'static str {
        "Frozen player is not the one to act"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power_ups::PowerUpKind;
    use crate::session::SessionConfig;

    #[test]
    fn test_freeze_invariant_after_activation() {
        let mut session = GameSession::new(SessionConfig::default());
        session.activate_power_up(Player::X, PowerUpKind::Freeze).unwrap();
        assert!(FreezeTargetsIdlePlayer::holds(&session));
        assert!(CooldownConsistent::holds(&session));
    }

    #[test]
    fn test_phase_invariant_detects_tampered_board() {
        let mut session = GameSession::new(SessionConfig::default());
        *session.board_mut_for_test() = "XXX OO. ...".parse().unwrap();
        assert!(!PhaseMatchesBoard::holds(&session));
    }
}
