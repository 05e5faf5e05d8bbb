//! Evolutionary Prisoner's Dilemma Engine
//!
//! Simulates the spread of cooperation on a social graph. Every round each
//! node plays the Prisoner's Dilemma with its neighbors, accumulates payoff,
//! and then an update rule decides its next strategy.
//!
//! # Modules
//!
//! - [`components`]: graph arena, trust signs and strategies
//! - [`systems`]: initializers, payoff protocols, update rules, game round
//! - [`simulation`]: run driver with a single seeded random stream
//! - [`setup`]: edge-list loading
//! - [`output`]: JSON summaries and strategy snapshots
//! - [`config`]: TOML configuration

use rand::rngs::SmallRng;
use thiserror::Error;

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::{Edge, Graph, NodeId, Sign, Strategy, StrategyMap};
pub use config::{ConfigError, SimConfig};
pub use error::{AssignmentStage, EngineError};
pub use output::ReportError;
pub use setup::LoadError;
pub use simulation::Simulation;
pub use systems::{GameProtocol, GameRound, Initializer, Payoffs, RoundOutcome, UpdateRule};

/// Seeded random number generator used for a run.
pub type SimRng = SmallRng;

/// Errors that can occur anywhere in a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}
