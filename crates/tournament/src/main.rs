//! Tournament CLI
//!
//! Run a bracket over a fixture or generated roster, replay saved traces and
//! inspect the active weights.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tournament::creature_core::WeightConfig;
use tournament::{
    select_roster, ArenaConfig, EntityProvider, FixtureProvider, GeneratedProvider, RunControl,
    TournamentRunner, TournamentTrace,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_MIN_ID: u32 = 1;
const DEFAULT_MAX_ID: u32 = 151;

#[derive(Parser)]
#[command(name = "tournament")]
#[command(about = "Single-elimination creature tournaments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a roster and run a tournament
    Run(RunArgs),

    /// Print the report of a saved trace
    Report {
        /// Trace JSON written by `run --out`
        path: PathBuf,
    },

    /// Show the weights a run would use
    Weights {
        /// Arena config (TOML) with weight overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Extra override, e.g. `--weight attack=2.5`
        #[arg(long = "weight", value_name = "KEY=VALUE", value_parser = parse_weight)]
        weights: Vec<(String, f64)>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Creature fixture (JSON array of records or API payloads)
    #[arg(long, conflicts_with = "generate")]
    fixture: Option<PathBuf>,

    /// Use generated creatures (the default without --fixture)
    #[arg(long)]
    generate: bool,

    /// Number of entrants
    #[arg(long, default_value_t = 8)]
    count: usize,

    /// Lowest id to draw (default: fixture minimum or 1)
    #[arg(long)]
    min_id: Option<u32>,

    /// Highest id to draw (default: fixture maximum or 151)
    #[arg(long)]
    max_id: Option<u32>,

    /// Seed for roster selection and battles (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Shuffle the roster before seeding the bracket
    #[arg(long)]
    shuffle: bool,

    /// Arena config (TOML) with weight and matchup overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Weight override applied after the config file, e.g. `--weight speed=3`
    #[arg(long = "weight", value_name = "KEY=VALUE", value_parser = parse_weight)]
    weights: Vec<(String, f64)>,

    /// Cancel the run if it takes longer than this
    #[arg(long, value_name = "MS")]
    time_limit_ms: Option<u64>,

    /// Write the trace as JSON
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight value '{value}': {e}"))?;
    Ok((key.trim().to_string(), value))
}

fn load_config(path: Option<&Path>) -> Result<ArenaConfig> {
    match path {
        Some(path) => ArenaConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(ArenaConfig::default()),
    }
}

fn build_weights(config: &ArenaConfig, overrides: &[(String, f64)]) -> Result<WeightConfig> {
    let mut weights = WeightConfig::new();
    config.apply_weights(&mut weights)?;
    weights.set_many(overrides.iter().map(|(k, v)| (k.as_str(), *v)))?;
    Ok(weights)
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let weights = build_weights(&config, &args.weights)?.get();
    let table = config.effectiveness_table()?;

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, "seeding run");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let (mut provider, bounds) = match &args.fixture {
        Some(path) => {
            let fixture = FixtureProvider::load(path)?;
            let bounds = fixture.id_bounds();
            (Box::new(fixture) as Box<dyn EntityProvider>, bounds)
        }
        None => (
            Box::new(GeneratedProvider::new(seed)) as Box<dyn EntityProvider>,
            None,
        ),
    };
    let min_id = args
        .min_id
        .or(bounds.as_ref().map(|b| *b.start()))
        .unwrap_or(DEFAULT_MIN_ID);
    let max_id = args
        .max_id
        .or(bounds.as_ref().map(|b| *b.end()))
        .unwrap_or(DEFAULT_MAX_ID);
    if min_id > max_id {
        bail!("--min-id {min_id} is greater than --max-id {max_id}");
    }

    let mut roster = select_roster(provider.as_mut(), args.count, min_id..=max_id, &mut rng)?;
    if args.shuffle {
        roster.shuffle(&mut rng);
    }

    println!("Seed: {seed}");
    let mut runner = TournamentRunner::new(&table);
    if let Some(ms) = args.time_limit_ms {
        runner = runner.with_control(RunControl::new(Some(Duration::from_millis(ms))));
    }

    match runner.run(&roster, &weights, &mut rng) {
        Ok(outcome) => {
            outcome.trace.print_report();
            save_trace(&outcome.trace, args.out.as_deref())?;
            Ok(())
        }
        Err(err) => {
            if let Some(partial) = err.partial_trace() {
                partial.print_report();
                save_trace(partial, args.out.as_deref())?;
            }
            Err(err.into())
        }
    }
}

fn save_trace(trace: &TournamentTrace, out: Option<&Path>) -> Result<()> {
    if let Some(path) = out {
        trace
            .save(path)
            .with_context(|| format!("saving trace to {}", path.display()))?;
        println!("Trace saved to {}", path.display());
    }
    Ok(())
}

fn show_weights(config: Option<&Path>, overrides: &[(String, f64)]) -> Result<()> {
    let weights = build_weights(&load_config(config)?, overrides)?;
    for (stat, weight) in weights.iter() {
        println!("{:<16} {:<16} {weight}", stat.key(), stat.label());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Report { path } => {
            let trace = TournamentTrace::load(&path)
                .with_context(|| format!("loading trace {}", path.display()))?;
            trace.print_report();
            Ok(())
        }
        Commands::Weights { config, weights } => show_weights(config.as_deref(), &weights),
    }
}
