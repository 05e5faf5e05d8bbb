//! Graph Component
//!
//! Arena-backed social graph. Nodes are addressed by a dense index assigned
//! in insertion order; that order is the enumeration order every system uses,
//! which keeps random draws reproducible. Edges live in per-node adjacency
//! lists and may carry a trust sign.

use std::collections::HashMap;

use evo_events::StrategyCounts;

use crate::components::strategy::{Strategy, StrategyMap};
use crate::components::NodeId;
use crate::error::{AssignmentStage, EngineError};

/// Trust sign of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Trust,
    Distrust,
}

impl Sign {
    /// Parses the `+1` / `-1` edge-list encoding.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Sign::Trust),
            -1 => Some(Sign::Distrust),
            _ => None,
        }
    }

    pub fn value(self) -> i64 {
        match self {
            Sign::Trust => 1,
            Sign::Distrust => -1,
        }
    }

    /// Multiplier applied to a neighbor's payoff.
    pub fn weight(self) -> f64 {
        self.value() as f64
    }
}

/// Outgoing adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Dense index of the neighbor
    pub target: usize,
    pub sign: Option<Sign>,
}

impl Edge {
    /// Sign used by the trust-weighted update rules: unsigned edges count as trust.
    pub fn sign_or_trust(&self) -> Sign {
        self.sign.unwrap_or(Sign::Trust)
    }
}

/// Social graph with per-node strategy state.
///
/// The edge relation is fixed once a simulation starts; only strategies
/// change afterwards.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    directed: bool,
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    out_edges: Vec<Vec<Edge>>,
    in_edges: Vec<Vec<usize>>,
    strategies: Vec<Option<Strategy>>,
    edge_count: usize,
}

impl Graph {
    /// Undirected graph: every edge is visible from both endpoints.
    pub fn undirected() -> Self {
        Self::default()
    }

    /// Directed graph: neighbors are out-neighbors, signs are per direction.
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of edges as added (an undirected edge counts once).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Adds a node if absent and returns its dense index.
    pub fn add_node(&mut self, id: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, idx);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        self.strategies.push(None);
        idx
    }

    /// Adds an edge, creating missing endpoints. Re-adding an existing edge
    /// overwrites its sign.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, sign: Option<Sign>) {
        let ui = self.add_node(u);
        let vi = self.add_node(v);

        let is_new = self.upsert_out(ui, vi, sign);
        if self.directed {
            if is_new {
                self.in_edges[vi].push(ui);
            }
        } else if ui != vi {
            self.upsert_out(vi, ui, sign);
        }
        if is_new {
            self.edge_count += 1;
        }
    }

    fn upsert_out(&mut self, from: usize, to: usize, sign: Option<Sign>) -> bool {
        match self.out_edges[from].iter_mut().find(|e| e.target == to) {
            Some(edge) => {
                edge.sign = sign;
                false
            }
            None => {
                self.out_edges[from].push(Edge { target: to, sign });
                true
            }
        }
    }

    /// Node ids in enumeration order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Id of the node at `idx`. Panics on an out-of-range index.
    pub fn id_of(&self, idx: usize) -> NodeId {
        self.ids[idx]
    }

    /// Open neighborhood of `idx`: out-neighbors on a directed graph.
    pub fn neighbors(&self, idx: usize) -> &[Edge] {
        &self.out_edges[idx]
    }

    /// The edge `from -> to`, if present.
    pub fn edge(&self, from: usize, to: usize) -> Option<&Edge> {
        self.out_edges[from].iter().find(|e| e.target == to)
    }

    /// Every unordered pair `{u, v}` joined by at least one edge, reported
    /// once with `id(u) < id(v)`.
    ///
    /// Pairs are grouped by `u` in enumeration order; within a group,
    /// out-neighbors come first in adjacency order, followed by nodes that
    /// only have an edge into `u`. Self-loops are never reported.
    pub fn canonical_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::with_capacity(self.edge_count);
        for u in 0..self.ids.len() {
            let uid = self.ids[u];
            let start = pairs.len();
            for edge in &self.out_edges[u] {
                if uid < self.ids[edge.target] {
                    pairs.push((u, edge.target));
                }
            }
            if self.directed {
                for &v in &self.in_edges[u] {
                    if uid < self.ids[v] && !pairs[start..].iter().any(|&(_, w)| w == v) {
                        pairs.push((u, v));
                    }
                }
            }
        }
        pairs
    }

    pub fn strategy(&self, idx: usize) -> Option<Strategy> {
        self.strategies[idx]
    }

    pub fn strategy_of(&self, id: NodeId) -> Result<Option<Strategy>, EngineError> {
        self.index_of(id)
            .map(|idx| self.strategies[idx])
            .ok_or(EngineError::UnknownNode(id))
    }

    pub fn set_strategy(&mut self, idx: usize, strategy: Strategy) {
        self.strategies[idx] = Some(strategy);
    }

    /// Sets a node's strategy by id, validating the raw value.
    pub fn set_raw_strategy(&mut self, id: NodeId, value: i64) -> Result<(), EngineError> {
        let strategy = Strategy::try_from(value)?;
        let idx = self.index_of(id).ok_or(EngineError::UnknownNode(id))?;
        self.strategies[idx] = Some(strategy);
        Ok(())
    }

    /// Strategy of `idx`, or an error naming the node if none was assigned.
    pub fn require_strategy(&self, idx: usize) -> Result<Strategy, EngineError> {
        self.strategies[idx].ok_or(EngineError::UnassignedStrategy(self.ids[idx]))
    }

    /// Copy of every node's strategy, indexed densely.
    ///
    /// Fails on the first node (in enumeration order) without a strategy.
    pub fn strategy_vector(&self) -> Result<Vec<Strategy>, EngineError> {
        (0..self.ids.len()).map(|idx| self.require_strategy(idx)).collect()
    }

    /// Assigned strategies keyed by node id. Unassigned nodes are absent.
    pub fn strategy_map(&self) -> StrategyMap {
        self.ids
            .iter()
            .zip(&self.strategies)
            .filter_map(|(&id, s)| s.map(|s| (id, s)))
            .collect()
    }

    /// Replaces every node's strategy from `assignment`.
    ///
    /// The mapping must cover exactly the node set. Nothing is written unless
    /// the check passes. Returns how many nodes changed strategy.
    pub fn apply_assignment(
        &mut self,
        assignment: &StrategyMap,
        stage: AssignmentStage,
    ) -> Result<usize, EngineError> {
        let mut missing: Vec<NodeId> = self
            .ids
            .iter()
            .copied()
            .filter(|id| !assignment.contains_key(id))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(EngineError::MissingAssignment { stage, missing });
        }

        let unknown: Vec<NodeId> = assignment
            .keys()
            .copied()
            .filter(|id| !self.index.contains_key(id))
            .collect();
        if !unknown.is_empty() {
            return Err(EngineError::UnknownAssignment { stage, unknown });
        }

        let mut changed = 0;
        for (idx, id) in self.ids.iter().enumerate() {
            let next = assignment[id];
            if self.strategies[idx] != Some(next) {
                changed += 1;
            }
            self.strategies[idx] = Some(next);
        }
        Ok(changed)
    }

    /// Cooperator / defector counts over assigned nodes.
    pub fn counts(&self) -> StrategyCounts {
        let mut counts = StrategyCounts::default();
        for strategy in self.strategies.iter().flatten() {
            match strategy {
                Strategy::Cooperate => counts.cooperators += 1,
                Strategy::Defect => counts.defectors += 1,
            }
        }
        counts
    }
}
