//! Game Round
//!
//! One discrete step of the simulation: play every game, then replace every
//! strategy through the update rule.

use std::fmt;

use evo_events::StrategyCounts;
use rand::Rng;

use crate::components::Graph;
use crate::error::EngineError;
use crate::systems::payoff::{play_plain, play_with_trust_and_pd, Payoffs};
use crate::systems::update::{update_strategies, UpdateRule};

/// How games are played along edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GameProtocol {
    /// One game per undirected pair with the current strategies
    #[default]
    Plain,
    /// Trust signs may pull each endpoint's strategy before its game
    Trust { flip_prob: f64 },
}

impl GameProtocol {
    pub fn name(&self) -> &'static str {
        match self {
            GameProtocol::Plain => "plain",
            GameProtocol::Trust { .. } => "trust",
        }
    }

    pub fn flip_prob(&self) -> Option<f64> {
        match self {
            GameProtocol::Plain => None,
            GameProtocol::Trust { flip_prob } => Some(*flip_prob),
        }
    }

    /// Plays every game and returns the fresh payoff vector.
    ///
    /// The trust protocol mutates strategies as it goes.
    pub fn play<R: Rng + ?Sized>(
        &self,
        graph: &mut Graph,
        rng: &mut R,
    ) -> Result<Payoffs, EngineError> {
        match self {
            GameProtocol::Plain => play_plain(graph),
            GameProtocol::Trust { flip_prob } => play_with_trust_and_pd(graph, *flip_prob, rng),
        }
    }
}

impl fmt::Display for GameProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameProtocol::Plain => write!(f, "plain"),
            GameProtocol::Trust { flip_prob } => write!(f, "trust(flip_prob={})", flip_prob),
        }
    }
}

/// Result of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// Payoffs the update rule saw
    pub payoffs: Payoffs,
    /// Nodes whose strategy at the end differs from the start of the round
    pub switched: usize,
    /// Population after the update
    pub counts: StrategyCounts,
}

/// Protocol + update rule composed into one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameRound {
    pub protocol: GameProtocol,
    pub rule: UpdateRule,
}

impl GameRound {
    pub fn new(protocol: GameProtocol, rule: UpdateRule) -> Self {
        Self { protocol, rule }
    }

    /// Plays one round on `graph`.
    ///
    /// Random draws happen in a fixed order: trust flips during the game pass,
    /// then the update rule's draws in node order. On error the graph may hold
    /// trust-pass flips but never a partial update.
    pub fn play<R: Rng + ?Sized>(
        &self,
        graph: &mut Graph,
        rng: &mut R,
    ) -> Result<RoundOutcome, EngineError> {
        let before = graph.strategy_vector()?;

        let payoffs = self.protocol.play(graph, rng)?;
        update_strategies(graph, &payoffs, self.rule, rng)?;

        let after = graph.strategy_vector()?;
        let switched = before.iter().zip(&after).filter(|(a, b)| a != b).count();
        let counts = graph.counts();

        tracing::debug!(
            protocol = self.protocol.name(),
            rule = self.rule.name(),
            cooperators = counts.cooperators,
            defectors = counts.defectors,
            switched,
            total_payoff = payoffs.total(),
            "round complete"
        );

        Ok(RoundOutcome {
            payoffs,
            switched,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{NodeId, Sign, Strategy, StrategyMap};
    use crate::error::AssignmentStage;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn star(center: NodeId, leaves: &[NodeId], strategies: &[(NodeId, Strategy)]) -> Graph {
        let mut g = Graph::undirected();
        for &leaf in leaves {
            g.add_edge(center, leaf, None);
        }
        let map: StrategyMap = strategies.iter().copied().collect();
        g.apply_assignment(&map, AssignmentStage::Initializer).unwrap();
        g
    }

    #[test]
    fn test_round_requires_assigned_strategies() {
        let mut g = Graph::undirected();
        g.add_edge(1, 2, None);
        let err = GameRound::default()
            .play(&mut g, &mut SmallRng::seed_from_u64(0))
            .unwrap_err();
        assert_eq!(err, EngineError::UnassignedStrategy(1));
    }

    #[test]
    fn test_defector_hub_spreads_under_imitation() {
        // Center defects against three cooperating leaves: payoff 15 vs 0 each.
        let mut g = star(
            1,
            &[2, 3, 4],
            &[
                (1, Strategy::Defect),
                (2, Strategy::Cooperate),
                (3, Strategy::Cooperate),
                (4, Strategy::Cooperate),
            ],
        );
        let round = GameRound::new(GameProtocol::Plain, UpdateRule::ImitateBestNeighbor);
        let outcome = round.play(&mut g, &mut SmallRng::seed_from_u64(1)).unwrap();

        assert_eq!(outcome.payoffs.as_slice(), &[15.0, 0.0, 0.0, 0.0]);
        assert_eq!(outcome.switched, 3);
        assert_eq!(outcome.counts, StrategyCounts::new(0, 4));
    }

    #[test]
    fn test_trust_protocol_round() {
        let mut g = Graph::directed();
        g.add_edge(1, 2, Some(Sign::Trust));
        g.add_edge(2, 1, Some(Sign::Trust));
        let map: StrategyMap = [(1, Strategy::Defect), (2, Strategy::Defect)].into_iter().collect();
        g.apply_assignment(&map, AssignmentStage::Initializer).unwrap();

        let round = GameRound::new(
            GameProtocol::Trust { flip_prob: 1.0 },
            UpdateRule::ImitateBestNeighbor,
        );
        let outcome = round.play(&mut g, &mut SmallRng::seed_from_u64(3)).unwrap();
        // Both flip to cooperate before playing; equal payoffs, both stay cooperative.
        assert_eq!(outcome.payoffs.as_slice(), &[3.0, 3.0]);
        assert_eq!(outcome.counts, StrategyCounts::new(2, 0));
        assert_eq!(outcome.switched, 2);
    }

    #[test]
    fn test_round_is_deterministic() {
        let build = || {
            let mut g = Graph::undirected();
            for i in 0..30i64 {
                g.add_edge(i, (i * 7 + 3) % 30, None);
                g.add_edge(i, (i + 1) % 30, None);
            }
            let map: StrategyMap = g
                .node_ids()
                .iter()
                .map(|&id| (id, Strategy::from_cooperates(id % 3 == 0)))
                .collect();
            g.apply_assignment(&map, AssignmentStage::Initializer).unwrap();
            g
        };

        for rule in UpdateRule::ALL {
            let round = GameRound::new(GameProtocol::Plain, rule);
            let mut a = build();
            let mut b = build();
            let oa = round.play(&mut a, &mut SmallRng::seed_from_u64(17)).unwrap();
            let ob = round.play(&mut b, &mut SmallRng::seed_from_u64(17)).unwrap();
            assert_eq!(oa, ob, "rule {}", rule);
            assert_eq!(a.strategy_map(), b.strategy_map(), "rule {}", rule);
        }
    }

    #[test]
    fn test_protocol_names_and_default() {
        assert_eq!(GameProtocol::default(), GameProtocol::Plain);
        assert_eq!(GameProtocol::Plain.flip_prob(), None);
        let trust = GameProtocol::Trust { flip_prob: 0.7 };
        assert_eq!(trust.name(), "trust");
        assert_eq!(trust.flip_prob(), Some(0.7));
    }
}
