//! Simulation Driver
//!
//! Owns the graph and the run's single random stream, seeds strategies once
//! and then advances one round at a time while recording population
//! statistics.

use evo_events::{NodeStrategy, RoundRecord, RunParameters, RunSummary, StrategySnapshot};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::{Graph, Strategy, StrategyMap};
use crate::config::SimConfig;
use crate::error::{AssignmentStage, EngineError};
use crate::systems::{assign_strategies, GameRound, Initializer};

/// One simulation run.
pub struct Simulation {
    graph: Graph,
    rng: SmallRng,
    round: GameRound,
    initializer: Initializer,
    cooperation_probability: f64,
    current_round: u64,
    initialized: bool,
    summary: RunSummary,
}

impl Simulation {
    /// Builds a run over `graph` from `config`. Nothing is drawn until
    /// [`Simulation::initialize`].
    pub fn new(graph: Graph, config: &SimConfig) -> Self {
        let round = GameRound::new(config.protocol(), config.update.rule);
        let parameters = RunParameters {
            seed: config.simulation.seed,
            rule: round.rule.name().to_string(),
            protocol: round.protocol.name().to_string(),
            flip_prob: round.protocol.flip_prob(),
            cooperation_probability: config.simulation.cooperation_probability,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            directed: graph.is_directed(),
        };

        if round.rule.uses_signs() && !graph.is_directed() {
            tracing::warn!(
                rule = round.rule.name(),
                "sign-aware rule on an undirected graph: every edge counts as trust"
            );
        }

        Self {
            graph,
            rng: SmallRng::seed_from_u64(config.simulation.seed),
            round,
            initializer: config.simulation.initializer,
            cooperation_probability: config.simulation.cooperation_probability,
            current_round: 0,
            initialized: false,
            summary: RunSummary::new(parameters),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn current_round(&self) -> u64 {
        self.current_round
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn into_summary(self) -> RunSummary {
        self.summary
    }

    /// Seeds every node's strategy and records round 0.
    pub fn initialize(&mut self) -> Result<&RoundRecord, EngineError> {
        assign_strategies(
            &mut self.graph,
            self.initializer,
            &mut self.rng,
            self.cooperation_probability,
        )?;
        Ok(self.record_start(0))
    }

    /// Seeds strategies from a saved snapshot instead of the initializer.
    ///
    /// The snapshot must cover every node with a 0/1 value; round numbering
    /// continues from the snapshot's round.
    pub fn resume_from(&mut self, snapshot: &StrategySnapshot) -> Result<&RoundRecord, EngineError> {
        let assignment = snapshot
            .nodes
            .iter()
            .map(|n| Strategy::try_from(n.strategy).map(|s| (n.node, s)))
            .collect::<Result<StrategyMap, EngineError>>()?;
        self.graph.apply_assignment(&assignment, AssignmentStage::Snapshot)?;
        tracing::info!(
            round = snapshot.round,
            cooperators = snapshot.cooperators(),
            "resumed from snapshot {}",
            snapshot.snapshot_id
        );
        Ok(self.record_start(snapshot.round))
    }

    fn record_start(&mut self, round: u64) -> &RoundRecord {
        self.current_round = round;
        self.initialized = true;
        let mut record = RoundRecord::initial(self.graph.counts());
        record.round = round;
        self.push(record)
    }

    /// Plays one round and records it.
    pub fn step(&mut self) -> Result<&RoundRecord, EngineError> {
        if !self.initialized {
            tracing::warn!("step() before initialize(); strategies must already be assigned");
        }
        let outcome = self.round.play(&mut self.graph, &mut self.rng)?;
        self.current_round += 1;
        let record = RoundRecord::new(
            self.current_round,
            outcome.counts,
            outcome.payoffs.total(),
            outcome.switched,
        );
        Ok(self.push(record))
    }

    /// Plays `rounds` rounds, initializing first if needed.
    pub fn run(&mut self, rounds: u64) -> Result<&RunSummary, EngineError> {
        if !self.initialized {
            self.initialize()?;
        }
        for _ in 0..rounds {
            self.step()?;
        }
        if let Some(last) = self.summary.last() {
            tracing::info!(
                rounds = last.round,
                cooperation = last.cooperation_fraction,
                "run complete"
            );
        }
        Ok(&self.summary)
    }

    /// Every assigned node's strategy at the current round, in id order.
    pub fn strategy_snapshot(&self) -> StrategySnapshot {
        let nodes = self
            .graph
            .strategy_map()
            .into_iter()
            .map(|(node, s)| NodeStrategy {
                node,
                strategy: s.value(),
            })
            .collect();
        StrategySnapshot::new(self.current_round).with_nodes(nodes)
    }

    fn push(&mut self, record: RoundRecord) -> &RoundRecord {
        self.summary.push(record);
        // Just pushed, so never empty.
        &self.summary.rounds[self.summary.rounds.len() - 1]
    }
}
