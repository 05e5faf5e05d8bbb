//! Engine error taxonomy.

use std::fmt;

use thiserror::Error;

use crate::components::NodeId;

/// Which producer handed an incomplete or foreign strategy mapping to the
/// orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStage {
    Initializer,
    UpdateRule,
    Snapshot,
}

impl fmt::Display for AssignmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentStage::Initializer => write!(f, "initializer"),
            AssignmentStage::UpdateRule => write!(f, "update rule"),
            AssignmentStage::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Errors raised by the game engine.
///
/// All of them are programming or data errors; nothing in the engine is
/// retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A strategy mapping omitted one or more nodes. `missing` is sorted.
    #[error("{stage} did not assign strategies for nodes: {missing:?}")]
    MissingAssignment {
        stage: AssignmentStage,
        missing: Vec<NodeId>,
    },

    /// A strategy mapping named nodes that are not in the graph.
    #[error("{stage} assigned strategies for unknown nodes: {unknown:?}")]
    UnknownAssignment {
        stage: AssignmentStage,
        unknown: Vec<NodeId>,
    },

    /// A strategy value outside {0, 1} reached the payoff table.
    #[error("strategy value {value} has no payoff table entry (expected 0 or 1)")]
    UndefinedPayoffLookup { value: i64 },

    /// A round was started before this node received a strategy.
    #[error("node {0} has no strategy assigned")]
    UnassignedStrategy(NodeId),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// The payoff vector does not line up with the graph's node arena.
    #[error("payoff vector has {got} entries but the graph has {expected} nodes")]
    PayoffLengthMismatch { expected: usize, got: usize },
}

/// Checks that `value` is a probability.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), EngineError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidProbability { name, value })
    }
}
