//! Strategy Update System
//!
//! Update rules compute every node's next strategy from the payoffs of the
//! round just played. Rules only read the graph, so every decision sees the
//! same pre-update snapshot; the orchestrator applies the result in one step.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Graph, Sign, Strategy, StrategyMap};
use crate::error::{AssignmentStage, EngineError};
use crate::systems::payoff::Payoffs;

/// Fermi noise temperature K.
pub const FERMI_TEMPERATURE: f64 = 0.1;

/// Probability of moving to a tied candidate (imitate-best) or of keeping the
/// current strategy on a zero weighted sum (all-neighbors).
pub const TIE_PROBABILITY: f64 = 0.5;

/// Registered update policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateRule {
    #[default]
    ImitateBestNeighbor,
    TrustAware,
    Fermi,
    AllNeighborsTrustAware,
}

impl UpdateRule {
    pub const ALL: [UpdateRule; 4] = [
        UpdateRule::ImitateBestNeighbor,
        UpdateRule::TrustAware,
        UpdateRule::Fermi,
        UpdateRule::AllNeighborsTrustAware,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UpdateRule::ImitateBestNeighbor => "imitate-best-neighbor",
            UpdateRule::TrustAware => "trust-aware",
            UpdateRule::Fermi => "fermi",
            UpdateRule::AllNeighborsTrustAware => "all-neighbors-trust-aware",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Whether the rule reads edge signs.
    pub fn uses_signs(&self) -> bool {
        matches!(self, UpdateRule::TrustAware | UpdateRule::AllNeighborsTrustAware)
    }

    /// Next strategy for every node.
    pub fn update<R: Rng + ?Sized>(
        &self,
        graph: &Graph,
        payoffs: &Payoffs,
        rng: &mut R,
    ) -> Result<StrategyMap, EngineError> {
        payoffs.check_len(graph)?;
        let current = graph.strategy_vector()?;

        let next = match self {
            UpdateRule::ImitateBestNeighbor => imitate_best_neighbor(graph, payoffs, &current, rng),
            UpdateRule::TrustAware => trust_aware_update(graph, payoffs, &current, rng),
            UpdateRule::Fermi => fermi_update(graph, payoffs, &current, rng),
            UpdateRule::AllNeighborsTrustAware => {
                all_neighbors_trust_aware_update(graph, payoffs, &current, rng)
            }
        };

        Ok(graph.node_ids().iter().copied().zip(next).collect())
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpdateRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|r| r.name()).collect();
            format!("unknown update rule '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

/// Runs `rule` and overwrites every node's strategy with the result.
///
/// Returns the number of nodes that changed strategy.
pub fn update_strategies<R: Rng + ?Sized>(
    graph: &mut Graph,
    payoffs: &Payoffs,
    rule: UpdateRule,
    rng: &mut R,
) -> Result<usize, EngineError> {
    let next = rule.update(graph, payoffs, rng)?;
    graph.apply_assignment(&next, AssignmentStage::UpdateRule)
}

/// Copy the strategy of the best-paid node among `u` and its neighbors.
///
/// A neighbor with strictly higher payoff always takes the lead. A neighbor
/// that exactly ties the current leader takes the lead with probability 1/2,
/// one draw per tie in neighbor order. Later neighbors are therefore favored
/// among ties; this is not a uniform choice.
fn imitate_best_neighbor<R: Rng + ?Sized>(
    graph: &Graph,
    payoffs: &Payoffs,
    current: &[Strategy],
    rng: &mut R,
) -> Vec<Strategy> {
    (0..graph.node_count())
        .map(|u| {
            let mut best = u;
            let mut best_pay = payoffs.get(u);
            for edge in graph.neighbors(u) {
                let pay = payoffs.get(edge.target);
                if pay > best_pay {
                    best = edge.target;
                    best_pay = pay;
                } else if pay == best_pay && rng.gen::<f64>() < TIE_PROBABILITY {
                    best = edge.target;
                }
            }
            current[best]
        })
        .collect()
}

/// Sign-weighted imitation.
///
/// Candidates are `u` (weight +1) and every neighbor `v` weighted by the sign
/// of `u -> v`, unsigned edges counting as trust. Ties on the maximum are
/// broken uniformly; a single maximum consumes no draw. Winning `u` keeps its
/// strategy, a trusted winner is copied, a distrusted winner is inverted.
fn trust_aware_update<R: Rng + ?Sized>(
    graph: &Graph,
    payoffs: &Payoffs,
    current: &[Strategy],
    rng: &mut R,
) -> Vec<Strategy> {
    let mut candidates: Vec<(usize, Sign)> = Vec::new();
    let mut best: Vec<usize> = Vec::new();

    (0..graph.node_count())
        .map(|u| {
            candidates.clear();
            candidates.push((u, Sign::Trust));
            candidates.extend(graph.neighbors(u).iter().map(|e| (e.target, e.sign_or_trust())));

            let effective = |&(v, sign): &(usize, Sign)| sign.weight() * payoffs.get(v);
            let max = candidates
                .iter()
                .map(effective)
                .fold(f64::NEG_INFINITY, f64::max);

            best.clear();
            best.extend(
                candidates
                    .iter()
                    .enumerate()
                    .filter(|&(_, c)| effective(c) == max)
                    .map(|(i, _)| i),
            );

            let pick = match best.len() {
                // Only reachable with NaN payoffs; keep the current strategy.
                0 => 0,
                1 => best[0],
                n => best[rng.gen_range(0..n)],
            };

            let (winner, sign) = candidates[pick];
            if winner == u {
                current[u]
            } else {
                match sign {
                    Sign::Trust => current[winner],
                    Sign::Distrust => current[winner].complement(),
                }
            }
        })
        .collect()
}

/// Logistic `1 / (1 + e^-x)` without overflow for large `|x|`.
pub fn stable_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Probability that a node with payoff `payoff_u` adopts the strategy of a
/// neighbor with payoff `payoff_v`.
pub fn fermi_probability(payoff_u: f64, payoff_v: f64, temperature: f64) -> f64 {
    stable_logistic((payoff_v - payoff_u) / temperature)
}

/// Pairwise comparison with one uniformly sampled neighbor. Nodes without
/// neighbors keep their strategy and consume no draws.
fn fermi_update<R: Rng + ?Sized>(
    graph: &Graph,
    payoffs: &Payoffs,
    current: &[Strategy],
    rng: &mut R,
) -> Vec<Strategy> {
    (0..graph.node_count())
        .map(|u| {
            let neighbors = graph.neighbors(u);
            if neighbors.is_empty() {
                return current[u];
            }

            let pick = if neighbors.len() == 1 {
                0
            } else {
                rng.gen_range(0..neighbors.len())
            };
            let v = neighbors[pick].target;
            let prob = fermi_probability(payoffs.get(u), payoffs.get(v), FERMI_TEMPERATURE);
            if rng.gen::<f64>() < prob {
                current[v]
            } else {
                current[u]
            }
        })
        .collect()
}

/// Cooperate when the sign-weighted payoff sum of `u` and its neighborhood is
/// positive, defect when negative. A zero sum keeps the current strategy with
/// probability 1/2 and inverts it otherwise.
fn all_neighbors_trust_aware_update<R: Rng + ?Sized>(
    graph: &Graph,
    payoffs: &Payoffs,
    current: &[Strategy],
    rng: &mut R,
) -> Vec<Strategy> {
    (0..graph.node_count())
        .map(|u| {
            let weighted: f64 = payoffs.get(u)
                + graph
                    .neighbors(u)
                    .iter()
                    .map(|e| e.sign_or_trust().weight() * payoffs.get(e.target))
                    .sum::<f64>();

            if weighted > 0.0 {
                Strategy::Cooperate
            } else if weighted < 0.0 {
                Strategy::Defect
            } else if rng.gen::<f64>() < TIE_PROBABILITY {
                current[u]
            } else {
                current[u].complement()
            }
        })
        .collect()
}
