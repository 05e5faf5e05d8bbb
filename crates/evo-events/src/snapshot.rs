//! Strategy Snapshots
//!
//! Serialization structs capturing every node's strategy after a round,
//! used for analysis and for resuming a run from a saved state.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID for the given round.
pub fn generate_snapshot_id(round: u64) -> String {
    format!("round_{:06}", round)
}

/// One node's strategy.
///
/// The strategy is stored as the raw integer (0 = defect, 1 = cooperate) so
/// that snapshots written by other tools can be read and validated by the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStrategy {
    pub node: i64,
    pub strategy: i64,
}

/// Complete strategy assignment at the end of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySnapshot {
    pub snapshot_id: String,
    pub round: u64,
    #[serde(default)]
    pub nodes: Vec<NodeStrategy>,
}

impl StrategySnapshot {
    pub fn new(round: u64) -> Self {
        Self {
            snapshot_id: generate_snapshot_id(round),
            round,
            nodes: Vec::new(),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<NodeStrategy>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes whose stored strategy is 1.
    pub fn cooperators(&self) -> usize {
        self.nodes.iter().filter(|n| n.strategy == 1).count()
    }
}
