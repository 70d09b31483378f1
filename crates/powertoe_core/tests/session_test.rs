//! Whole-game scenarios through the public session API.

use powertoe_core::{
    Activation, AiOpponent, Board, Difficulty, DifficultyPolicy, EffectSummary, GameResult,
    GameSession, NoEffectReason, Player, PowerUpKind, SessionConfig, SessionError, SessionPhase,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;

#[test]
fn test_completing_top_row_wins() {
    let mut session = GameSession::default();
    for index in [0, 3, 1, 4] {
        session.apply_placement(index).unwrap();
    }
    session.apply_placement(2).unwrap();
    assert_eq!(
        session.phase(),
        SessionPhase::Terminal(GameResult::Win {
            player: Player::X,
            line: [0, 1, 2]
        })
    );
}

#[test]
fn test_shielded_steal_is_spent_without_effect() {
    let mut session = GameSession::default();
    session.apply_placement(4).unwrap();
    session
        .activate_power_up(Player::O, PowerUpKind::Shield)
        .unwrap();
    session.supply_power_up_target(0).unwrap();
    session.apply_placement(0).unwrap();

    let before = *session.board();
    assert_eq!(
        session.activate_power_up(Player::X, PowerUpKind::Steal),
        Ok(Activation::Armed(PowerUpKind::Steal))
    );
    assert_eq!(
        session.supply_power_up_target(0),
        Ok(EffectSummary::NoEffect(NoEffectReason::ShieldedTarget))
    );
    assert_eq!(*session.board(), before);
    assert!(!session.power_ups(Player::X).is_available(PowerUpKind::Steal));
}

#[test]
fn test_reset_after_game_over() {
    let mut session = GameSession::default();
    session
        .activate_power_up(Player::X, PowerUpKind::DoubleMove)
        .unwrap();
    for index in [0, 1, 4, 2] {
        session.apply_placement(index).unwrap();
    }
    assert!(session.phase().is_terminal());
    assert_eq!(session.apply_placement(5), Err(SessionError::GameOver));

    session.reset();
    assert_eq!(session.phase(), SessionPhase::AwaitingMove(Player::X));
    assert_eq!(*session.board(), Board::new());
    for player in Player::BOTH {
        for kind in PowerUpKind::iter() {
            let slot = session.power_ups(player).slot(kind);
            assert!(*slot.available());
            assert_eq!(*slot.cooldown(), 0);
        }
    }
}

#[test]
fn test_full_game_against_ai_ends_without_human_win() {
    let config = SessionConfig {
        policy: DifficultyPolicy::flawless(),
        opponent: Some(AiOpponent::new(Player::O, Difficulty::Nightmare)),
        ..SessionConfig::default()
    };
    let mut session = GameSession::new(config);
    let mut rng = StdRng::seed_from_u64(13);

    // The human always takes the lowest free cell.
    while !session.phase().is_terminal() {
        if session.is_ai_turn() {
            session.play_ai_turn(&mut rng).unwrap();
        } else {
            let index = session.board().empty_cells()[0];
            session.apply_placement(index).unwrap();
        }
    }
    match session.phase() {
        SessionPhase::Terminal(result) => assert_ne!(result.winner(), Some(Player::X)),
        other => panic!("unexpected phase {other}"),
    }
}
