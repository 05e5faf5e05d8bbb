//! Strategy Initialization
//!
//! Initializers produce a strategy for every node once, before the first
//! round. The orchestrator checks coverage and writes the mapping.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Graph, Strategy, StrategyMap};
use crate::error::{check_probability, AssignmentStage, EngineError};

/// Registered initialization policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Initializer {
    /// Independent Bernoulli(p) draw per node
    #[default]
    CoinFlip,
    /// Keep whatever the graph already carries
    Current,
}

impl Initializer {
    pub const ALL: [Initializer; 2] = [Initializer::CoinFlip, Initializer::Current];

    pub fn name(&self) -> &'static str {
        match self {
            Initializer::CoinFlip => "coin-flip",
            Initializer::Current => "current",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    /// Produces a strategy mapping. `p` is the target cooperation probability.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        graph: &Graph,
        rng: &mut R,
        p: f64,
    ) -> Result<StrategyMap, EngineError> {
        match self {
            Initializer::CoinFlip => coin_flip_initializer(graph, rng, p),
            Initializer::Current => Ok(graph.strategy_map()),
        }
    }
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Initializer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|i| i.name()).collect();
            format!("unknown initializer '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

/// Cooperate iff a uniform sample is below `p`.
///
/// All samples are drawn up front, one per node in enumeration order.
pub fn coin_flip_initializer<R: Rng + ?Sized>(
    graph: &Graph,
    rng: &mut R,
    p: f64,
) -> Result<StrategyMap, EngineError> {
    check_probability("cooperation probability", p)?;

    let samples: Vec<f64> = (0..graph.node_count()).map(|_| rng.gen()).collect();
    Ok(graph
        .node_ids()
        .iter()
        .zip(samples)
        .map(|(&id, sample)| (id, Strategy::from_cooperates(sample < p)))
        .collect())
}

/// Runs `initializer` and writes its mapping into the graph.
pub fn assign_strategies<R: Rng + ?Sized>(
    graph: &mut Graph,
    initializer: Initializer,
    rng: &mut R,
    p: f64,
) -> Result<(), EngineError> {
    let assignment = initializer.assign(graph, rng, p)?;
    graph.apply_assignment(&assignment, AssignmentStage::Initializer)?;

    let counts = graph.counts();
    tracing::debug!(
        initializer = initializer.name(),
        cooperators = counts.cooperators,
        defectors = counts.defectors,
        "strategies assigned"
    );
    Ok(())
}
