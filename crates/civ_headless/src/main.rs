//! Headless hex strategy runner.
//!
//! This binary runs the game without graphics, controlled via JSON on
//! stdin/stdout. Designed for AI agents, CI testing, and determinism checks.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read requests from stdin
//! cargo run -p civ_headless
//!
//! # Play a scenario interactively
//! cargo run -p civ_headless -- run --scenario scenarios/river_crossing.ron
//!
//! # Check that a scenario loads
//! cargo run -p civ_headless -- validate --scenario scenarios/river_crossing.ron
//!
//! # Apply a command script and print the final state
//! cargo run -p civ_headless -- script --commands opening.jsonl
//!
//! # Replay a command script several times in parallel and compare hashes
//! cargo run -p civ_headless -- verify --commands opening.jsonl --runs 8
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON requests, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for the request/response format.

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use civ_core::command::Command;
use civ_core::engine::Engine;
use civ_headless::runner::HeadlessRunner;
use civ_headless::scenario::Scenario;

#[derive(Parser)]
#[command(name = "civ_headless")]
#[command(about = "Headless hex strategy runner for AI testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single interactive game
    Run {
        /// Scenario file to load (built-in skirmish when omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },

    /// Load a scenario and report whether it builds
    Validate {
        /// Scenario file to check
        #[arg(short, long)]
        scenario: PathBuf,
    },

    /// Apply a file of JSON commands and print the final snapshot
    Script {
        /// Scenario file to load (built-in skirmish when omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// File with one JSON command per line
        #[arg(short, long)]
        commands: PathBuf,
    },

    /// Verify determinism by replaying a command script several times
    Verify {
        /// Scenario file to load (built-in skirmish when omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// File with one JSON command per line
        #[arg(short, long)]
        commands: PathBuf,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    match cli.command {
        Some(Commands::Run { scenario }) => cmd_run(scenario.as_deref()),
        Some(Commands::Validate { scenario }) => cmd_validate(&scenario),
        Some(Commands::Script { scenario, commands }) => cmd_script(scenario.as_deref(), &commands),
        Some(Commands::Verify {
            scenario,
            commands,
            runs,
        }) => cmd_verify(scenario.as_deref(), &commands, runs),
        None => {
            // Default: interactive mode
            cmd_run(None);
        }
    }
}

fn load_scenario(path: Option<&Path>) -> Scenario {
    let Some(path) = path else {
        return Scenario::skirmish();
    };
    match Scenario::load(path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Failed to load scenario: {e}");
            std::process::exit(1);
        }
    }
}

fn load_commands(path: &Path) -> Vec<Command> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    let mut commands = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", path.display());
                std::process::exit(1);
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(command) => commands.push(command),
            Err(e) => {
                eprintln!("{}:{}: invalid command: {e}", path.display(), number + 1);
                std::process::exit(1);
            }
        }
    }
    commands
}

/// Run a single interactive game
fn cmd_run(scenario: Option<&Path>) {
    tracing::info!("Starting interactive session");

    let scenario = load_scenario(scenario);
    let mut runner = match HeadlessRunner::from_scenario(&scenario) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = runner.run(stdin.lock(), stdout.lock()) {
        eprintln!("Session aborted: {e}");
        std::process::exit(1);
    }
}

/// Check a scenario file
fn cmd_validate(path: &Path) {
    let scenario = load_scenario(Some(path));
    match scenario.build_state() {
        Ok(state) => {
            eprintln!(
                "PASS: {} ({} tiles, {} units, {} cities)",
                scenario.name,
                state.map().len(),
                state.units().len(),
                state.cities().len()
            );
        }
        Err(e) => {
            eprintln!("FAIL: {e}");
            std::process::exit(1);
        }
    }
}

/// Play `commands` against a fresh engine, returning it and the rejection count.
fn play(scenario: &Scenario, commands: &[Command]) -> Option<(Engine, usize)> {
    let state = match scenario.build_state() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "scenario does not build");
            return None;
        }
    };
    let mut engine = Engine::new(state);
    engine.start();
    let rejected = commands
        .iter()
        .filter(|command| !engine.execute_command(command).success)
        .count();
    Some((engine, rejected))
}

/// Apply a command script and print the outcome
fn cmd_script(scenario: Option<&Path>, commands: &Path) {
    let scenario = load_scenario(scenario);
    let commands = load_commands(commands);
    let Some((engine, rejected)) = play(&scenario, &commands) else {
        std::process::exit(1);
    };

    let report = serde_json::json!({
        "commands": commands.len(),
        "rejected": rejected,
        "hash": engine.state().state_hash(),
        "snapshot": engine.snapshot(),
    });
    println!("{report}");
    eprintln!(
        "Applied {} of {} commands",
        commands.len() - rejected,
        commands.len()
    );
}

/// Verify determinism
fn cmd_verify(scenario: Option<&Path>, commands: &Path, runs: u32) {
    let scenario = load_scenario(scenario);
    let commands = load_commands(commands);
    tracing::info!(
        "Verifying determinism: {} with {} commands ({} runs)",
        scenario.name,
        commands.len(),
        runs
    );

    let hashes: Vec<Option<u64>> = (0..runs.max(1))
        .into_par_iter()
        .map(|_| play(&scenario, &commands).map(|(engine, _)| engine.state().state_hash()))
        .collect();

    let first = hashes.first().copied().flatten();
    let deterministic = first.is_some() && hashes.iter().all(|h| *h == first);
    if deterministic {
        eprintln!("PASS: All {} runs produced identical results", hashes.len());
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        for (run, hash) in hashes.iter().enumerate() {
            eprintln!("  run {run}: {hash:?}");
        }
        std::process::exit(1);
    }
}
