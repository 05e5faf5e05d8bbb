//! Configuration System
//!
//! Loads run parameters from a TOML file (`tuning.toml` by default). Every
//! section and field is optional; missing values fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::systems::{GameProtocol, Initializer, UpdateRule, DEFAULT_FLIP_PROB};

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub update: UpdateConfig,
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the single random stream of the run
    pub seed: u64,
    /// Rounds to play after initialization
    pub rounds: u64,
    /// Probability that the coin-flip initializer assigns cooperate
    pub cooperation_probability: f64,
    pub initializer: Initializer,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rounds: 10,
            cooperation_probability: 0.5,
            initializer: Initializer::CoinFlip,
        }
    }
}

/// Which game protocol is played along edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolKind {
    #[default]
    Plain,
    Trust,
}

/// Game protocol parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub protocol: ProtocolKind,
    /// Trust-pull probability, used by the trust protocol only
    pub flip_prob: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolKind::Plain,
            flip_prob: DEFAULT_FLIP_PROB,
        }
    }
}

/// Update rule selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub rule: UpdateRule,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the default tuning file if it exists, otherwise uses defaults.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_TUNING_PATH).exists() {
            Self::from_file(DEFAULT_TUNING_PATH)
        } else {
            tracing::debug!("no {} found, using default configuration", DEFAULT_TUNING_PATH);
            Ok(Self::default())
        }
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.simulation.cooperation_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::Invalid(format!(
                "simulation.cooperation_probability must lie in [0, 1], got {}",
                p
            )));
        }
        let f = self.game.flip_prob;
        if !(0.0..=1.0).contains(&f) {
            return Err(ConfigError::Invalid(format!(
                "game.flip_prob must lie in [0, 1], got {}",
                f
            )));
        }
        Ok(())
    }

    /// The configured game protocol.
    pub fn protocol(&self) -> GameProtocol {
        match self.game.protocol {
            ProtocolKind::Plain => GameProtocol::Plain,
            ProtocolKind::Trust => GameProtocol::Trust {
                flip_prob: self.game.flip_prob,
            },
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
