//! Strategy Component
//!
//! The binary Prisoner's Dilemma strategy carried by every node.

use std::collections::BTreeMap;
use std::fmt;

use crate::components::NodeId;
use crate::error::EngineError;

/// Node strategy. The discriminants are the raw values used in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strategy {
    Defect = 0,
    Cooperate = 1,
}

impl Strategy {
    pub fn from_cooperates(cooperates: bool) -> Self {
        if cooperates {
            Strategy::Cooperate
        } else {
            Strategy::Defect
        }
    }

    /// The opposite strategy.
    pub fn complement(self) -> Self {
        match self {
            Strategy::Cooperate => Strategy::Defect,
            Strategy::Defect => Strategy::Cooperate,
        }
    }

    pub fn value(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Strategy {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Strategy::Defect),
            1 => Ok(Strategy::Cooperate),
            value => Err(EngineError::UndefinedPayoffLookup { value }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Cooperate => write!(f, "cooperate"),
            Strategy::Defect => write!(f, "defect"),
        }
    }
}

/// Node -> strategy mapping returned by initializers and update rules.
///
/// Ordered so that error reports and snapshots are stable.
pub type StrategyMap = BTreeMap<NodeId, Strategy>;
