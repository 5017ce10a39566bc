//! Difficulty levels and tunable game settings.
//!
//! Settings can come from a TOML file; missing keys keep their defaults:
//!
//! ```toml
//! time_limit_secs = 45
//! hint_budget = 5
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{instrument, warn};

/// Named grid sizes offered to players.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 10x10 grid.
    Easy,
    /// 20x20 grid.
    #[default]
    Medium,
    /// 30x30 grid.
    Hard,
}

impl Difficulty {
    /// Lower-case label, as stored in session records.
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Grid `(width, height)` for this level.
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (10, 10),
            Difficulty::Medium => (20, 20),
            Difficulty::Hard => (30, 30),
        }
    }

    /// Lenient lookup for free-form player input: case-insensitive, and
    /// anything unrecognised becomes [`Difficulty::Medium`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(input = name, "Unknown difficulty, using medium");
            Difficulty::Medium
        })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::new(format!("unknown difficulty '{}'", other))),
        }
    }
}

/// Longest time limit accepted, in seconds.
pub const MAX_TIME_LIMIT_SECS: u64 = 86_400;

/// Longest poll or tick interval accepted, in milliseconds.
pub const MAX_INTERVAL_MS: u64 = 3_600_000;

/// Tunable settings for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds the player has to reach the exit.
    pub time_limit_secs: u64,
    /// Hints available per session.
    pub hint_budget: u32,
    /// Preferred minimum Manhattan distance between entrance and exit.
    pub min_exit_distance: usize,
    /// Interval at which held movement keys are sampled, in milliseconds.
    pub move_poll_ms: u64,
    /// Interval between timer ticks, in milliseconds.
    pub tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 30,
            hint_budget: 3,
            min_exit_distance: 5,
            move_poll_ms: 100,
            tick_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Parses settings from TOML text and validates them.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads settings from a TOML file.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Rejects settings the session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TIME_LIMIT_SECS).contains(&self.time_limit_secs) {
            return Err(ConfigError::new(format!(
                "time_limit_secs must be between 1 and {}",
                MAX_TIME_LIMIT_SECS
            )));
        }
        for (name, value) in [("move_poll_ms", self.move_poll_ms), ("tick_ms", self.tick_ms)] {
            if !(1..=MAX_INTERVAL_MS).contains(&value) {
                return Err(ConfigError::new(format!(
                    "{} must be between 1 and {}",
                    name, MAX_INTERVAL_MS
                )));
            }
        }
        Ok(())
    }

    /// The time limit as a chrono duration, clamped to [`MAX_TIME_LIMIT_SECS`].
    pub fn time_limit(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.time_limit_secs.min(MAX_TIME_LIMIT_SECS) as i64)
    }

    /// The move poll interval, clamped to [`MAX_INTERVAL_MS`].
    pub fn move_poll(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.move_poll_ms.min(MAX_INTERVAL_MS) as i64)
    }

    /// The timer tick interval, clamped to [`MAX_INTERVAL_MS`].
    pub fn tick(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.tick_ms.min(MAX_INTERVAL_MS) as i64)
    }
}
