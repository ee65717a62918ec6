//! Feed simulation driver.
//!
//! Runs the weighted-random social feed simulation headlessly for a fixed
//! number of ticks, optionally resuming from and saving to a JSON state
//! snapshot.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sim_core::{ActionKind, Runner, SimState, Simulator, Tuning, DEFAULT_TUNING_PATH};
use textgen::Generator;

/// Command line arguments for the simulation.
#[derive(Parser, Debug)]
#[command(name = "feed_sim")]
#[command(about = "A weighted-random social feed simulator")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of actions to simulate (defaults to the tuning file value)
    #[arg(long)]
    ticks: Option<u64>,

    /// Seconds between ticks (overrides the tuning file)
    #[arg(long)]
    interval: Option<f64>,

    /// Tuning file path
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    config: PathBuf,

    /// Resume from a state snapshot
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the final state snapshot here
    #[arg(long)]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut tuning = Tuning::load_or_default(&args.config);
    if let Some(interval) = args.interval {
        tuning.simulation.tick_interval_secs = interval;
    }
    let ticks = args.ticks.unwrap_or(tuning.simulation.default_ticks);

    println!("Feed Simulation");
    println!("===============");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", ticks);
    println!("Interval: {}s", tuning.simulation.tick_interval_secs);
    println!("Provider: {:?}", tuning.generator.provider);
    println!();

    let generator = match Generator::from_config(&tuning.generator) {
        Ok(generator) => generator,
        Err(error) => {
            eprintln!("Error: could not build text generator: {error}");
            return ExitCode::FAILURE;
        }
    };

    let mut simulator = Simulator::new(tuning, generator, args.seed);

    if let Some(path) = &args.load {
        let snapshot = match SimState::load_snapshot(path) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                eprintln!("Error: could not load snapshot {}: {error}", path.display());
                return ExitCode::FAILURE;
            }
        };
        if let Err(error) = simulator.import_snapshot(snapshot) {
            eprintln!("Error: could not import snapshot: {error}");
            return ExitCode::FAILURE;
        }
        println!(
            "Resumed: {} users, {} posts, {} events",
            simulator.state().users.len(),
            simulator.state().posts.len(),
            simulator.state().events.len()
        );
    }

    let mut runner = Runner::new(simulator);
    let summary = match runner.run(ticks).await {
        Ok(summary) => summary,
        Err(error) => {
            eprintln!("Error: simulation failed: {error}");
            return ExitCode::FAILURE;
        }
    };

    let simulator = runner.into_simulator();
    let state = simulator.state();

    println!();
    println!("Run summary");
    println!("-----------");
    println!("Users joined:    {}", summary.count(ActionKind::AddUser));
    println!("Posts created:   {}", summary.count(ActionKind::Post));
    println!("Replies created: {}", summary.count(ActionKind::Reply));
    println!("Votes cast:      {}", summary.count(ActionKind::Vote));
    println!("Events launched: {}", summary.count(ActionKind::Event));
    println!("Skipped ticks:   {}", summary.count(ActionKind::Skip));
    println!();
    println!(
        "Final state: {} users, {} posts, {} comments, {} events",
        state.users.len(),
        state.posts.len(),
        state.comments.len(),
        state.events.len()
    );

    if let Some(path) = &args.save {
        let snapshot = simulator.export_snapshot();
        if let Err(error) = SimState::save_snapshot(&snapshot, path) {
            eprintln!("Error: could not save snapshot {}: {error}", path.display());
            return ExitCode::FAILURE;
        }
        println!("Saved snapshot to {}", path.display());
    }

    ExitCode::SUCCESS
}
