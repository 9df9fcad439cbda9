//! Game configuration.
//!
//! Defaults reproduce the classic machine: $5 a spin, $5 a nudge, $6 a hold,
//! a $200 starting pot, ten moves per spin and a two second full spin.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Tunable costs, timings and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Cost of one full spin.
    pub play_cost: i64,
    /// Cost of nudging one reel.
    pub nudge_cost: i64,
    /// Cost of holding one reel.
    pub hold_cost: i64,
    /// Bankroll a session starts (and restarts) with.
    pub starting_bankroll: i64,
    /// Nudges and holds allowed between two full spins.
    pub max_moves: u32,
    /// Length of a full spin in milliseconds.
    pub spin_duration_ms: u64,
    /// Maximum characters in a player name.
    pub max_name_len: usize,
    /// Number of records kept in the high-score ledger.
    pub max_highscores: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_cost: 5,
            nudge_cost: 5,
            hold_cost: 6,
            starting_bankroll: 200,
            max_moves: 10,
            spin_duration_ms: 2000,
            max_name_len: 8,
            max_highscores: 10,
        }
    }
}

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for a [`GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the game cannot run with.
    #[error("invalid config: {field} {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl GameConfig {
    /// Length of a full spin.
    #[must_use]
    pub const fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    /// Load a configuration from a JSON file and validate it.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        };

        if self.play_cost <= 0 {
            return invalid("play_cost", "must be positive");
        }
        if self.nudge_cost <= 0 {
            return invalid("nudge_cost", "must be positive");
        }
        if self.hold_cost <= 0 {
            return invalid("hold_cost", "must be positive");
        }
        if self.starting_bankroll < self.play_cost {
            return invalid("starting_bankroll", "must cover at least one spin");
        }
        if self.spin_duration_ms == 0 {
            return invalid("spin_duration_ms", "must be non-zero");
        }
        // Names commit at two characters or more.
        if self.max_name_len < 2 {
            return invalid("max_name_len", "must be at least 2");
        }
        if self.max_highscores == 0 {
            return invalid("max_highscores", "must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spin_duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slots.json");
        fs::write(&path, r#"{ "play_cost": 10, "starting_bankroll": 500 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.play_cost, 10);
        assert_eq!(config.starting_bankroll, 500);
        assert_eq!(config.hold_cost, 6);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slots.json");
        fs::write(&path, r#"{ "jackpot": 1 }"#).unwrap();

        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = GameConfig {
            hold_cost: 0,
            ..GameConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hold_cost"));

        let config = GameConfig {
            starting_bankroll: 1,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = GameConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
