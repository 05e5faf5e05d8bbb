//! Run Summaries
//!
//! The complete record of a simulation run: parameters plus one
//! [`RoundRecord`] per round, round 0 being the initial assignment.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::round::RoundRecord;

/// Generates a fresh run ID.
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Parameters a run was started with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub seed: u64,
    pub rule: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_prob: Option<f64>,
    pub cooperation_probability: f64,
    pub nodes: usize,
    pub edges: usize,
    pub directed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub parameters: RunParameters,
    #[serde(default)]
    pub rounds: Vec<RoundRecord>,
}

impl RunSummary {
    pub fn new(parameters: RunParameters) -> Self {
        Self {
            run_id: generate_run_id(),
            parameters,
            rounds: Vec::new(),
        }
    }

    pub fn push(&mut self, record: RoundRecord) {
        self.rounds.push(record);
    }

    pub fn last(&self) -> Option<&RoundRecord> {
        self.rounds.last()
    }
}
