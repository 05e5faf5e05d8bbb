//! Determinism verification tests
//!
//! A run is a pure function of (graph, configuration, seed): the same inputs
//! must give identical strategies and payoffs round after round.

use evo_core::config::ProtocolKind;
use evo_core::systems::{assign_strategies, GameProtocol, GameRound, Initializer, UpdateRule};
use evo_core::{Graph, Sign, SimConfig, SimRng, Simulation};
use rand::{Rng, SeedableRng};

/// Deterministic pseudo-random signed digraph.
fn signed_graph(n: i64, seed: u64) -> Graph {
    let mut rng = SimRng::seed_from_u64(seed);
    let mut g = Graph::directed();
    for u in 0..n {
        g.add_node(u);
    }
    for u in 0..n {
        for _ in 0..3 {
            let v = rng.gen_range(0..n);
            if v != u {
                let sign = if rng.gen_bool(0.8) { Sign::Trust } else { Sign::Distrust };
                g.add_edge(u, v, Some(sign));
            }
        }
    }
    g
}

fn ring_lattice(n: i64, k: i64) -> Graph {
    let mut g = Graph::undirected();
    for u in 0..n {
        for d in 1..=k {
            g.add_edge(u, (u + d) % n, None);
        }
    }
    g
}

/// Test that the seeded generator produces identical sequences with the same seed
#[test]
fn test_rng_determinism() {
    let mut rng1 = SimRng::seed_from_u64(42);
    let values1: Vec<f64> = (0..100).map(|_| rng1.gen()).collect();

    let mut rng2 = SimRng::seed_from_u64(42);
    let values2: Vec<f64> = (0..100).map(|_| rng2.gen()).collect();

    assert_eq!(values1, values2, "RNG sequences should be identical with same seed");
}

/// Test that one round produces identical strategies and payoffs for every rule and protocol
#[test]
fn test_single_round_determinism() {
    let protocols = [GameProtocol::Plain, GameProtocol::Trust { flip_prob: 0.7 }];

    for protocol in protocols {
        for rule in UpdateRule::ALL {
            let round = GameRound::new(protocol, rule);
            let run = |seed: u64| {
                let mut g = signed_graph(60, 5);
                let mut rng = SimRng::seed_from_u64(seed);
                assign_strategies(&mut g, Initializer::CoinFlip, &mut rng, 0.5).unwrap();
                let outcome = round.play(&mut g, &mut rng).unwrap();
                (outcome, g.strategy_map())
            };

            let (o1, s1) = run(1234);
            let (o2, s2) = run(1234);
            assert_eq!(o1.payoffs, o2.payoffs, "{} / {}", protocol, rule);
            assert_eq!(s1, s2, "{} / {}", protocol, rule);
        }
    }
}

/// Test that whole runs repeat exactly
#[test]
fn test_full_run_determinism() {
    let mut config = SimConfig::default();
    config.game.protocol = ProtocolKind::Trust;
    config.update.rule = UpdateRule::TrustAware;
    config.simulation.seed = 2024;

    let mut a = Simulation::new(signed_graph(80, 9), &config);
    let mut b = Simulation::new(signed_graph(80, 9), &config);
    a.run(8).unwrap();
    b.run(8).unwrap();

    assert_eq!(a.summary().rounds, b.summary().rounds);
    assert_eq!(a.strategy_snapshot(), b.strategy_snapshot());
}

/// Test that different seeds lead to different trajectories
#[test]
fn test_different_seeds_diverge() {
    let mut config = SimConfig::default();
    config.update.rule = UpdateRule::Fermi;

    config.simulation.seed = 1;
    let mut a = Simulation::new(ring_lattice(200, 2), &config);
    a.run(3).unwrap();

    config.simulation.seed = 2;
    let mut b = Simulation::new(ring_lattice(200, 2), &config);
    b.run(3).unwrap();

    assert_ne!(a.strategy_snapshot().nodes, b.strategy_snapshot().nodes);
}

/// Test that the draw schedule is fixed: initializer draws come first, so
/// splitting initialization and rounds across calls changes nothing
#[test]
fn test_draw_order_is_stable_across_call_boundaries() {
    let config = SimConfig::default();

    let mut whole = Simulation::new(ring_lattice(50, 1), &config);
    whole.run(4).unwrap();

    let mut stepped = Simulation::new(ring_lattice(50, 1), &config);
    stepped.initialize().unwrap();
    for _ in 0..4 {
        stepped.step().unwrap();
    }

    assert_eq!(whole.summary().rounds, stepped.summary().rounds);
    assert_eq!(whole.strategy_snapshot(), stepped.strategy_snapshot());
}
