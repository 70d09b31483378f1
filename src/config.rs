//! Application configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use powertoe_core::{AiOpponent, Difficulty, DifficultyPolicy, Player, PowerUpRules, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// AI opponent settings.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Strength tier.
    difficulty: Difficulty,
    /// The mark the AI plays.
    symbol: Player,
    /// Per-tier accuracy.
    #[serde(flatten)]
    policy: DifficultyPolicy,
    /// Fixed RNG seed for reproducible games.
    seed: Option<u64>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            symbol: Player::O,
            policy: DifficultyPolicy::default(),
            seed: None,
        }
    }
}

/// Timer settings for the interactive runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Pause before the AI plays, in milliseconds.
    think_delay_ms: u64,
    /// Cooldown tick period, in milliseconds.
    cooldown_tick_ms: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            think_delay_ms: 500,
            cooldown_tick_ms: 1000,
        }
    }
}

impl RuntimeSettings {
    /// AI think delay.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Cooldown tick period.
    pub fn cooldown_tick(&self) -> Duration {
        Duration::from_millis(self.cooldown_tick_ms)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// AI opponent.
    ai: AiSettings,
    /// Power-up cooldowns and freeze length.
    power_ups: PowerUpRules,
    /// Timers.
    runtime: RuntimeSettings,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(difficulty = %config.ai.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let policy = self.ai.policy;
        for (name, value) in [
            ("medium_accuracy", policy.medium_accuracy),
            ("hard_accuracy", policy.hard_accuracy),
            ("nightmare_accuracy", policy.nightmare_accuracy),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::new(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if self.runtime.cooldown_tick_ms == 0 {
            return Err(ConfigError::new(
                "cooldown_tick_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Replaces the AI difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.ai.difficulty = difficulty;
        self
    }

    /// Replaces the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ai.seed = Some(seed);
        self
    }

    /// Session configuration; `hotseat` leaves both sides to humans.
    pub fn session_config(&self, hotseat: bool) -> SessionConfig {
        SessionConfig {
            rules: self.power_ups,
            policy: self.ai.policy,
            opponent: (!hotseat).then(|| AiOpponent::new(self.ai.symbol, self.ai.difficulty)),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powertoe_core::PowerUpKind;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.runtime().think_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [ai]
            difficulty = "nightmare"
            symbol = "X"
            hard_accuracy = 0.5

            [power_ups.cooldowns]
            bomb = 2
            "#,
        )
        .unwrap();
        assert_eq!(*config.ai().difficulty(), Difficulty::Nightmare);
        assert_eq!(*config.ai().symbol(), Player::X);
        assert_eq!(config.ai().policy().hard_accuracy, 0.5);
        assert_eq!(config.ai().policy().medium_accuracy, 0.7);
        assert_eq!(*config.power_ups().spec(PowerUpKind::Bomb).cooldown(), 2);
        assert_eq!(*config.power_ups().spec(PowerUpKind::Steal).cooldown(), 5);
    }

    #[test]
    fn test_rejects_bad_accuracy() {
        let err = AppConfig::from_toml("[ai]\nmedium_accuracy = 1.5").unwrap_err();
        assert!(err.message.contains("medium_accuracy"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_session_config_respects_hotseat() {
        let config = AppConfig::default().with_difficulty(Difficulty::Easy);
        assert_eq!(config.session_config(true).opponent, None);
        assert_eq!(
            config.session_config(false).opponent,
            Some(AiOpponent::new(Player::O, Difficulty::Easy))
        );
    }
}
