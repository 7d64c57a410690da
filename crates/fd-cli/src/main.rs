//! CLI frontend for fairdice: one round of non-transitive dice against the
//! house, with every random value committed before the player answers.

mod commands;
mod table;

use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fd_round::{HouseStrategy, RoundConfig};

use commands::Failure;

const EXAMPLE: &str = "fairdice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3";

#[derive(Parser)]
#[command(
    name = "fairdice",
    about = "Non-transitive dice against the house, with provably fair throws",
    version,
    after_help = "Example: fairdice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3"
)]
struct Cli {
    /// Dice definitions: at least three, each six comma-separated integers
    #[arg(value_name = "DICE", allow_hyphen_values = true)]
    dice: Vec<String>,

    /// How the house picks its dice
    #[arg(short, long, value_enum, default_value_t = Strategy::Default)]
    strategy: Strategy,

    /// Write the round transcript as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    transcript: Option<PathBuf>,

    /// Check a saved transcript instead of playing
    #[arg(long, value_name = "FILE", conflicts_with_all = ["dice", "transcript"])]
    verify: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Take dice 1, or the lowest free dice if the player holds it
    Default,
    /// Counter the player's dice when the player picked first
    BestResponse,
}

impl From<Strategy> for HouseStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Default => HouseStrategy::Default,
            Strategy::BestResponse => HouseStrategy::BestResponse,
        }
    }
}

fn main() {
    // Game output owns stdout; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match &cli.verify {
        Some(path) => commands::verify::run(path),
        None => {
            let config = RoundConfig::default().with_strategy(cli.strategy.into());
            commands::play::run(&cli.dice, &config, cli.transcript.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        if let Failure::Usage(_) = e {
            eprintln!("{}", Cli::command().render_usage());
            eprintln!("Example: {EXAMPLE}");
        }
        process::exit(e.exit_code());
    }
}
