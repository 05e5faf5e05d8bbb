//! Engine property tests
//!
//! Coverage, binary strategies, payoff table shape and the worked examples
//! for each update rule.

use std::collections::BTreeSet;

use evo_core::systems::{
    assign_strategies, fermi_probability, payoff, play_plain, play_with_trust_and_pd,
    update_strategies, GameProtocol, GameRound, Initializer, Payoffs, UpdateRule,
    FERMI_TEMPERATURE,
};
use evo_core::{
    AssignmentStage, EngineError, Graph, NodeId, Sign, SimRng, Strategy, StrategyMap,
};
use rand::rngs::mock::StepRng;
use rand::SeedableRng;

fn assign(graph: &mut Graph, strategies: &[(NodeId, Strategy)]) {
    let map: StrategyMap = strategies.iter().copied().collect();
    graph.apply_assignment(&map, AssignmentStage::Initializer).unwrap();
}

/// Small social graph with a hub, a chain, a triangle and an isolated node.
fn mixed_graph() -> Graph {
    let mut g = Graph::undirected();
    for leaf in [2, 3, 4, 5] {
        g.add_edge(1, leaf, None);
    }
    g.add_edge(5, 6, None);
    g.add_edge(6, 7, None);
    g.add_edge(7, 8, None);
    g.add_edge(8, 6, None);
    g.add_node(99);
    g
}

fn signed_mixed_graph() -> Graph {
    let mut g = Graph::directed();
    g.add_edge(1, 2, Some(Sign::Trust));
    g.add_edge(2, 1, Some(Sign::Distrust));
    g.add_edge(2, 3, Some(Sign::Distrust));
    g.add_edge(3, 4, None);
    g.add_edge(4, 1, Some(Sign::Trust));
    g.add_edge(5, 4, Some(Sign::Distrust));
    g.add_node(42);
    g
}

#[test]
fn test_coverage_invariant_for_all_rules() {
    for graph in [mixed_graph(), signed_mixed_graph()] {
        let expected: BTreeSet<NodeId> = graph.node_ids().iter().copied().collect();
        for rule in UpdateRule::ALL {
            let mut g = graph.clone();
            let mut rng = SimRng::seed_from_u64(77);
            assign_strategies(&mut g, Initializer::CoinFlip, &mut rng, 0.5).unwrap();
            let payoffs = play_plain(&g).unwrap();

            let next = rule.update(&g, &payoffs, &mut rng).unwrap();
            let keys: BTreeSet<NodeId> = next.keys().copied().collect();
            assert_eq!(keys, expected, "rule {}", rule);
        }
    }
}

#[test]
fn test_binary_invariant_over_many_rounds() {
    let protocols = [GameProtocol::Plain, GameProtocol::Trust { flip_prob: 0.5 }];
    for protocol in protocols {
        for rule in UpdateRule::ALL {
            let mut g = signed_mixed_graph();
            let mut rng = SimRng::seed_from_u64(3);
            assign_strategies(&mut g, Initializer::CoinFlip, &mut rng, 0.4).unwrap();

            let round = GameRound::new(protocol, rule);
            for _ in 0..20 {
                let outcome = round.play(&mut g, &mut rng).unwrap();
                assert_eq!(outcome.counts.total(), g.node_count());
                for &id in g.node_ids() {
                    let raw = g.strategy_of(id).unwrap().map(Strategy::value);
                    assert!(matches!(raw, Some(0) | Some(1)));
                }
            }
        }
    }
}

#[test]
fn test_payoff_table_is_a_prisoners_dilemma() {
    use Strategy::{Cooperate as C, Defect as D};
    let (s, t) = payoff(C, D);
    let (t2, s2) = payoff(D, C);
    assert_eq!((s, t), (s2, t2));
    assert_eq!(payoff(C, C), (3.0, 3.0));
    assert_eq!(payoff(D, D), (1.0, 1.0));

    let (r, _) = payoff(C, C);
    let (p, _) = payoff(D, D);
    assert!(t > r && r > p && p > s);
}

#[test]
fn test_imitate_best_neighbor_worked_example() {
    let mut g = Graph::undirected();
    g.add_edge(1, 2, None);
    g.add_edge(2, 3, None);
    assign(
        &mut g,
        &[(1, Strategy::Defect), (2, Strategy::Cooperate), (3, Strategy::Defect)],
    );
    let payoffs = Payoffs::from_ids(&g, &[(1, 1.0), (2, 5.0), (3, 2.0)]).unwrap();

    update_strategies(&mut g, &payoffs, UpdateRule::ImitateBestNeighbor, &mut SimRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(g.counts().cooperators, 3);
}

#[test]
fn test_equal_payoffs_keep_strategies_when_ties_resolve_to_self() {
    let mut g = mixed_graph();
    let mut rng = SimRng::seed_from_u64(10);
    assign_strategies(&mut g, Initializer::CoinFlip, &mut rng, 0.5).unwrap();
    let before = g.strategy_map();

    // Every draw is just below 1.0, so no tie ever switches.
    let mut keep_self = StepRng::new(u64::MAX, 0);
    let zero = Payoffs::zeroed(g.node_count());
    let changed =
        update_strategies(&mut g, &zero, UpdateRule::ImitateBestNeighbor, &mut keep_self).unwrap();

    assert_eq!(changed, 0);
    assert_eq!(g.strategy_map(), before);
}

#[test]
fn test_fermi_boundary_is_one_half() {
    for payoff in [-12.0, 0.0, 3.0, 1e9] {
        assert_eq!(fermi_probability(payoff, payoff, FERMI_TEMPERATURE), 0.5);
    }
}

#[test]
fn test_trust_aware_complement_example() {
    let mut g = Graph::directed();
    g.add_edge(1, 2, Some(Sign::Distrust));
    assign(&mut g, &[(1, Strategy::Cooperate), (2, Strategy::Cooperate)]);
    let payoffs = Payoffs::from_ids(&g, &[(1, 0.0), (2, -3.0)]).unwrap();

    let next = UpdateRule::TrustAware
        .update(&g, &payoffs, &mut SimRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(next[&1], Strategy::Defect);
}

#[test]
fn test_trust_pass_order_dependency_is_reproducible() {
    // Node 3 is pulled to cooperate by its first pair and is then seen as a
    // cooperator by the later pair.
    let mut g = Graph::directed();
    g.add_edge(1, 3, None);
    g.add_edge(3, 1, Some(Sign::Trust));
    g.add_edge(2, 3, None);
    assign(
        &mut g,
        &[(1, Strategy::Cooperate), (2, Strategy::Cooperate), (3, Strategy::Defect)],
    );

    let mut always = StepRng::new(0, 0);
    let payoffs = play_with_trust_and_pd(&mut g, 1.0, &mut always).unwrap();
    assert_eq!(payoffs.of(&g, 1), Ok(3.0));
    assert_eq!(payoffs.of(&g, 2), Ok(3.0));
    assert_eq!(payoffs.of(&g, 3), Ok(6.0));
}

#[test]
fn test_missing_assignment_is_fatal_and_lists_nodes() {
    let mut g = mixed_graph();
    let mut partial = StrategyMap::new();
    partial.insert(1, Strategy::Cooperate);
    partial.insert(99, Strategy::Defect);

    let err = g.apply_assignment(&partial, AssignmentStage::UpdateRule).unwrap_err();
    match err {
        EngineError::MissingAssignment { stage, missing } => {
            assert_eq!(stage, AssignmentStage::UpdateRule);
            assert_eq!(missing, vec![2, 3, 4, 5, 6, 7, 8]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
