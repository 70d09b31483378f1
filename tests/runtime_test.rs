//! Concurrency behaviour of the session runtime.

use powertoe_core::{
    AiOpponent, Board, Difficulty, DifficultyPolicy, GameSession, Player, PowerUpKind,
    SessionConfig, SessionPhase,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use strictly_powertoe::SessionHandle;

fn against_ai() -> SessionHandle {
    let config = SessionConfig {
        policy: DifficultyPolicy::flawless(),
        opponent: Some(AiOpponent::new(Player::O, Difficulty::Hard)),
        ..SessionConfig::default()
    };
    SessionHandle::new(GameSession::new(config), StdRng::seed_from_u64(11))
}

#[tokio::test]
async fn test_reset_discards_pending_ai_move() {
    let handle = against_ai();
    handle.select_cell(0).await.unwrap();
    let task = handle
        .schedule_ai_move(Duration::from_millis(200))
        .await
        .expect("AI should be on move");

    handle.reset().await;
    let outcome = task.await;
    assert!(outcome.is_err_and(|err| err.is_cancelled()));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(handle.read(|s| *s.board()).await, Board::new());
    assert_eq!(
        handle.phase().await,
        SessionPhase::AwaitingMove(Player::X)
    );
    assert_eq!(handle.read(|s| s.epoch()).await, 1);
}

#[tokio::test]
async fn test_ai_replies_after_delay() {
    let handle = against_ai();
    handle.select_cell(4).await.unwrap();
    let task = handle
        .schedule_ai_move(Duration::from_millis(10))
        .await
        .unwrap();
    let index = task.await.unwrap().expect("AI should move");
    assert!([0, 2, 6, 8].contains(&index));
    assert_eq!(handle.read(|s| s.move_count()).await, 2);
}

#[tokio::test]
async fn test_ticker_restores_power_ups() {
    let handle = SessionHandle::new(
        GameSession::new(SessionConfig::default()),
        StdRng::seed_from_u64(1),
    );
    handle
        .activate_power_up(Player::X, PowerUpKind::Freeze)
        .await
        .unwrap();
    assert!(
        !handle
            .read(|s| s.power_ups(Player::X).is_available(PowerUpKind::Freeze))
            .await
    );

    let ticker = handle.spawn_cooldown_ticker(Duration::from_millis(5));
    let mut ready = false;
    for _ in 0..200 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        if handle
            .read(|s| s.power_ups(Player::X).is_available(PowerUpKind::Freeze))
            .await
        {
            ready = true;
            break;
        }
    }
    ticker.abort();
    assert!(ready, "freeze should come off cooldown");
}
