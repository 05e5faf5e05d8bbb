//! Evolutionary Prisoner's Dilemma Simulator
//!
//! Loads a social graph from an edge list, seeds strategies and plays a
//! number of rounds, printing the cooperator share after each one.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evo_core::config::ProtocolKind;
use evo_core::output::{read_snapshot, write_snapshot_to_dir, write_summary};
use evo_core::setup::{load_edge_list, load_signed_edge_list};
use evo_core::{Initializer, SimConfig, SimError, Simulation, UpdateRule};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "evo_sim")]
#[command(about = "Evolution of cooperation on social graphs")]
struct Args {
    /// Edge-list file (`source target` or `source target sign` per line)
    #[arg(long, required_unless_present = "print_default_config")]
    graph: Option<PathBuf>,

    /// Read the graph as a signed edge list
    #[arg(long)]
    signed: bool,

    /// Keep edge direction and signs (signed edge lists only)
    #[arg(long, requires = "signed")]
    directed: bool,

    /// TOML configuration file; defaults to tuning.toml if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds to simulate
    #[arg(long)]
    rounds: Option<u64>,

    /// Update rule
    #[arg(long)]
    rule: Option<UpdateRule>,

    /// Initializer
    #[arg(long)]
    initializer: Option<Initializer>,

    /// Game protocol: plain or trust
    #[arg(long, value_parser = parse_protocol)]
    protocol: Option<ProtocolKind>,

    /// Trust-pull probability for the trust protocol
    #[arg(long)]
    flip_prob: Option<f64>,

    /// Probability of starting as a cooperator
    #[arg(long)]
    cooperation_probability: Option<f64>,

    /// Start from a saved strategy snapshot instead of the initializer
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write the run summary as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a strategy snapshot per round into this directory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn parse_protocol(s: &str) -> Result<ProtocolKind, String> {
    match s {
        "plain" => Ok(ProtocolKind::Plain),
        "trust" => Ok(ProtocolKind::Trust),
        other => Err(format!("unknown protocol '{}' (expected plain or trust)", other)),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::load_or_default()?,
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(p) = args.cooperation_probability {
        config.simulation.cooperation_probability = p;
    }
    if let Some(initializer) = args.initializer {
        config.simulation.initializer = initializer;
    }
    if let Some(protocol) = args.protocol {
        config.game.protocol = protocol;
    }
    if let Some(flip_prob) = args.flip_prob {
        config.game.flip_prob = flip_prob;
    }
    if let Some(rule) = args.rule {
        config.update.rule = rule;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), SimError> {
    if args.print_default_config {
        print!("{}", SimConfig::default().to_toml()?);
        return Ok(());
    }

    let config = load_config(&args)?;
    let graph = match &args.graph {
        Some(path) if args.signed => load_signed_edge_list(path, args.directed)?,
        Some(path) => load_edge_list(path)?,
        // clap enforces --graph unless printing the default config
        None => return Ok(()),
    };

    println!("Evolution of Cooperation");
    println!("========================");
    println!("Seed: {}", config.simulation.seed);
    println!("Rounds: {}", config.simulation.rounds);
    println!("Protocol: {}", config.protocol());
    println!("Update rule: {}", config.update.rule);
    println!(
        "Graph: {} nodes, {} edges{}",
        graph.node_count(),
        graph.edge_count(),
        if graph.is_directed() { " (directed)" } else { "" }
    );
    println!();

    let mut sim = Simulation::new(graph, &config);
    let start = match &args.resume {
        Some(path) => sim.resume_from(&read_snapshot(path)?)?,
        None => sim.initialize()?,
    };
    println!("{}", start.progress_line());
    write_round_snapshot(&sim, &args)?;

    for _ in 0..config.simulation.rounds {
        let record = sim.step()?;
        println!("{}", record.progress_line());
        write_round_snapshot(&sim, &args)?;
    }

    if let Some(path) = &args.output {
        write_summary(path, &sim.into_summary())?;
        println!();
        println!("Wrote run summary to {}", path.display());
    }
    Ok(())
}

fn write_round_snapshot(sim: &Simulation, args: &Args) -> Result<(), SimError> {
    if let Some(dir) = &args.snapshot_dir {
        let path = write_snapshot_to_dir(dir, &sim.strategy_snapshot())?;
        tracing::debug!("wrote {}", path.display());
    }
    Ok(())
}
