//! Round Records
//!
//! Per-round aggregate statistics of the strategy population.

use serde::{Deserialize, Serialize};

/// Cooperator and defector head-counts at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyCounts {
    pub cooperators: usize,
    pub defectors: usize,
}

impl StrategyCounts {
    pub fn new(cooperators: usize, defectors: usize) -> Self {
        Self {
            cooperators,
            defectors,
        }
    }

    pub fn total(&self) -> usize {
        self.cooperators + self.defectors
    }

    /// Fraction of cooperators, 0.0 for an empty population.
    pub fn cooperation_fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.cooperators as f64 / n as f64,
        }
    }

    pub fn defection_fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.defectors as f64 / n as f64,
        }
    }
}

/// Summary of one played round.
///
/// Round 0 is the initial assignment and carries no payoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u64,
    pub counts: StrategyCounts,
    pub cooperation_fraction: f64,
    #[serde(default)]
    pub total_payoff: f64,
    #[serde(default)]
    pub mean_payoff: f64,
    /// Nodes whose strategy differs from the previous round
    #[serde(default)]
    pub switched: usize,
}

impl RoundRecord {
    /// Record for the initial strategy assignment.
    pub fn initial(counts: StrategyCounts) -> Self {
        Self {
            round: 0,
            counts,
            cooperation_fraction: counts.cooperation_fraction(),
            total_payoff: 0.0,
            mean_payoff: 0.0,
            switched: 0,
        }
    }

    pub fn new(round: u64, counts: StrategyCounts, total_payoff: f64, switched: usize) -> Self {
        let mean_payoff = match counts.total() {
            0 => 0.0,
            n => total_payoff / n as f64,
        };
        Self {
            round,
            counts,
            cooperation_fraction: counts.cooperation_fraction(),
            total_payoff,
            mean_payoff,
            switched,
        }
    }

    /// Console line in the `Round N: xx.xx% cooperators, yy.yy% defectors` format.
    pub fn progress_line(&self) -> String {
        format!(
            "Round {}: {:.2}% cooperators, {:.2}% defectors",
            self.round,
            self.counts.cooperation_fraction() * 100.0,
            self.counts.defection_fraction() * 100.0
        )
    }
}
