//! Loading configuration files from disk.

use powertoe_core::{Difficulty, Player, PowerUpKind};
use std::io::Write;
use std::time::Duration;
use strictly_powertoe::AppConfig;

#[test]
fn test_load_full_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[ai]
difficulty = "hard"
symbol = "X"
nightmare_accuracy = 0.95
seed = 42

[power_ups]
freeze_turns = 2

[power_ups.cooldowns]
time_warp = 9

[runtime]
think_delay_ms = 0
cooldown_tick_ms = 250
"#
    )
    .unwrap();

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.ai().difficulty(), Difficulty::Hard);
    assert_eq!(*config.ai().symbol(), Player::X);
    assert_eq!(*config.ai().seed(), Some(42));
    assert_eq!(config.ai().policy().nightmare_accuracy, 0.95);
    assert_eq!(config.power_ups().freeze_turns, 2);
    assert_eq!(*config.power_ups().spec(PowerUpKind::TimeWarp).cooldown(), 9);
    assert_eq!(config.runtime().think_delay(), Duration::ZERO);
    assert_eq!(config.runtime().cooldown_tick(), Duration::from_millis(250));

    let session = config.session_config(false);
    assert_eq!(session.rules.freeze_turns, 2);
    assert_eq!(session.opponent.map(|ai| *ai.player()), Some(Player::X));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[ai\ndifficulty = ").unwrap();
    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_load_without_path_uses_defaults() {
    assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
}
