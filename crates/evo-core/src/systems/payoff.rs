//! Payoff System
//!
//! Pairwise Prisoner's Dilemma games along every edge, accumulated into a
//! fresh per-node payoff vector each round.

use rand::Rng;

use crate::components::{Graph, NodeId, Sign, Strategy};
use crate::error::{check_probability, EngineError};

/// Payoff constants (T > R > P > S)
pub mod payoff_constants {
    /// Defecting against a cooperator
    pub const TEMPTATION: f64 = 5.0;
    /// Mutual cooperation
    pub const REWARD: f64 = 3.0;
    /// Mutual defection
    pub const PUNISHMENT: f64 = 1.0;
    /// Cooperating against a defector
    pub const SUCKER: f64 = 0.0;
}

/// Default probability that a trust sign pulls a node's strategy before a game.
pub const DEFAULT_FLIP_PROB: f64 = 0.7;

/// Payoffs `(u, v)` for one game.
pub fn payoff(u: Strategy, v: Strategy) -> (f64, f64) {
    use payoff_constants::*;
    match (u, v) {
        (Strategy::Cooperate, Strategy::Cooperate) => (REWARD, REWARD),
        (Strategy::Cooperate, Strategy::Defect) => (SUCKER, TEMPTATION),
        (Strategy::Defect, Strategy::Cooperate) => (TEMPTATION, SUCKER),
        (Strategy::Defect, Strategy::Defect) => (PUNISHMENT, PUNISHMENT),
    }
}

/// Payoff lookup on raw strategy values. Anything outside {0, 1} is an error.
pub fn payoff_raw(u: i64, v: i64) -> Result<(f64, f64), EngineError> {
    Ok(payoff(Strategy::try_from(u)?, Strategy::try_from(v)?))
}

/// Per-node accumulated payoff, indexed like the graph's node arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Payoffs {
    values: Vec<f64>,
}

impl Payoffs {
    /// All-zero payoffs for `n` nodes.
    pub fn zeroed(n: usize) -> Self {
        Self {
            values: vec![0.0; n],
        }
    }

    /// Payoffs keyed by id, in the graph's enumeration order. Nodes absent
    /// from `by_id` get 0.0.
    pub fn from_ids(graph: &Graph, by_id: &[(NodeId, f64)]) -> Result<Self, EngineError> {
        let mut payoffs = Self::zeroed(graph.node_count());
        for &(id, value) in by_id {
            let idx = graph.index_of(id).ok_or(EngineError::UnknownNode(id))?;
            payoffs.values[idx] = value;
        }
        Ok(payoffs)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Payoff of the node at dense index `idx`.
    pub fn get(&self, idx: usize) -> f64 {
        self.values[idx]
    }

    pub fn add(&mut self, idx: usize, amount: f64) {
        self.values[idx] += amount;
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Payoff of node `id`.
    pub fn of(&self, graph: &Graph, id: NodeId) -> Result<f64, EngineError> {
        graph
            .index_of(id)
            .map(|idx| self.values[idx])
            .ok_or(EngineError::UnknownNode(id))
    }

    pub(crate) fn check_len(&self, graph: &Graph) -> Result<(), EngineError> {
        if self.values.len() == graph.node_count() {
            Ok(())
        } else {
            Err(EngineError::PayoffLengthMismatch {
                expected: graph.node_count(),
                got: self.values.len(),
            })
        }
    }
}

/// Outcome of a single pairwise game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameResult {
    pub u: NodeId,
    pub v: NodeId,
    pub payoff_u: f64,
    pub payoff_v: f64,
}

/// Plays one game per canonical pair with the current strategies.
///
/// Results come back in pair enumeration order; see
/// [`Graph::canonical_pairs`].
pub fn play_prisoners_dilemma(graph: &Graph) -> Result<Vec<GameResult>, EngineError> {
    let pairs = graph.canonical_pairs();
    let mut results = Vec::with_capacity(pairs.len());
    for (u, v) in pairs {
        let (payoff_u, payoff_v) = payoff(graph.require_strategy(u)?, graph.require_strategy(v)?);
        results.push(GameResult {
            u: graph.id_of(u),
            v: graph.id_of(v),
            payoff_u,
            payoff_v,
        });
    }
    Ok(results)
}

/// Sums game results into per-node payoffs.
pub fn accumulate_payoffs(graph: &Graph, results: &[GameResult]) -> Result<Payoffs, EngineError> {
    let mut payoffs = Payoffs::zeroed(graph.node_count());
    for result in results {
        let u = graph.index_of(result.u).ok_or(EngineError::UnknownNode(result.u))?;
        let v = graph.index_of(result.v).ok_or(EngineError::UnknownNode(result.v))?;
        payoffs.add(u, result.payoff_u);
        payoffs.add(v, result.payoff_v);
    }
    Ok(payoffs)
}

/// Plain protocol: one game per edge, no strategy changes.
pub fn play_plain(graph: &Graph) -> Result<Payoffs, EngineError> {
    let results = play_prisoners_dilemma(graph)?;
    accumulate_payoffs(graph, &results)
}

/// Trust-weighted protocol.
///
/// Before each pair `{u, v}` plays, `u` looks at the sign of `u -> v`: trust
/// makes it cooperate with probability `flip_prob`, distrust makes it defect
/// with probability `flip_prob`. `v` does the same with `v -> u` if that edge
/// exists. Unsigned or absent edges draw nothing and flip nothing.
///
/// Flips are written to the graph immediately, so a node's flip from an
/// earlier pair is what later pairs see. Pair order is
/// [`Graph::canonical_pairs`].
pub fn play_with_trust_and_pd<R: Rng + ?Sized>(
    graph: &mut Graph,
    flip_prob: f64,
    rng: &mut R,
) -> Result<Payoffs, EngineError> {
    check_probability("flip_prob", flip_prob)?;
    // Fail before any flip rather than half way through the pass.
    graph.strategy_vector()?;

    let mut payoffs = Payoffs::zeroed(graph.node_count());
    let mut flips = 0usize;

    for (u, v) in graph.canonical_pairs() {
        flips += trust_flip(graph, u, v, flip_prob, rng);
        flips += trust_flip(graph, v, u, flip_prob, rng);

        let (pu, pv) = payoff(graph.require_strategy(u)?, graph.require_strategy(v)?);
        payoffs.add(u, pu);
        payoffs.add(v, pv);
    }

    tracing::trace!(flips, flip_prob, "trust pass complete");
    Ok(payoffs)
}

/// Applies `from`'s trust pull along `from -> to`. Returns 1 if the strategy changed.
fn trust_flip<R: Rng + ?Sized>(
    graph: &mut Graph,
    from: usize,
    to: usize,
    flip_prob: f64,
    rng: &mut R,
) -> usize {
    let target = match graph.edge(from, to).and_then(|e| e.sign) {
        Some(Sign::Trust) => Strategy::Cooperate,
        Some(Sign::Distrust) => Strategy::Defect,
        None => return 0,
    };
    if rng.gen::<f64>() >= flip_prob {
        return 0;
    }
    let changed = graph.strategy(from) != Some(target);
    graph.set_strategy(from, target);
    usize::from(changed)
}
