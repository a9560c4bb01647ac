//! Beverage Bandits -- runs a combat map to completion.
//!
//! Usage:
//!   bandits [OPTIONS] [MAP]
//!
//! Options:
//!   --mode M          combat, tune, or both (default: both)
//!   --threads N       Worker threads for the tuning search (default: 1)
//!   --start-power N   First attack power the tuning search tries (default: 4)
//!   --max-power N     Last attack power the tuning search tries (default: 200)
//!   --max-rounds N    Give up on a combat after N rounds (default: unlimited)
//!   --trace           Print the grid after every completed round
//!   --json            Print results as JSON, one object per line
//!   --quiet           Only log warnings and errors
//!
//! Log verbosity follows `RUST_LOG` when set.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bandits::board::GridWorld;
use bandits::engine::{CombatOutcome, SimConfig, SimError, Simulation};
use bandits::protocol::{format_grid, load_map, MapError};
use bandits::search::{tune_attack_power, TuneError, TuningConfig, TuningResult};

/// Everything that can end a run early.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("combat failed: {0}")]
    Sim(#[from] SimError),

    #[error("tuning failed: {0}")]
    Tune(#[from] TuneError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Combat,
    Tune,
    Both,
}

impl Mode {
    fn parse(s: &str) -> Option<Mode> {
        match s {
            "combat" => Some(Mode::Combat),
            "tune" => Some(Mode::Tune),
            "both" => Some(Mode::Both),
            _ => None,
        }
    }
}

struct Options {
    map: PathBuf,
    mode: Mode,
    tuning: TuningConfig,
    max_rounds: Option<usize>,
    trace: bool,
    json: bool,
    quiet: bool,
}

/// One line of `--json` output.
#[derive(Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
enum Report {
    Combat(CombatOutcome),
    Tune(TuningResult),
}

fn main() -> ExitCode {
    let opts = match parse_args(env::args().skip(1).collect()) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            return ExitCode::from(2);
        }
    };

    let default_level = if opts.quiet { "bandits=warn" } else { "bandits=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Options) -> Result<(), AppError> {
    let world = load_map(&opts.map)?;
    info!(
        map = %opts.map.display(),
        width = world.width(),
        height = world.height(),
        units = world.units().len(),
        "map loaded"
    );

    if opts.mode != Mode::Tune {
        let outcome = run_combat(world.clone(), opts)?;
        if opts.json {
            println!("{}", serde_json::to_string(&Report::Combat(outcome))?);
        } else {
            println!(
                "combat: faction {:?} wins after {} rounds with {} hit points left, outcome {}",
                outcome.winner, outcome.rounds, outcome.remaining_hit_points, outcome.outcome
            );
        }
    }

    if opts.mode != Mode::Combat {
        let config = TuningConfig {
            max_rounds: opts.max_rounds,
            ..opts.tuning.clone()
        };
        let result = tune_attack_power(&world, &config)?;
        if opts.json {
            println!("{}", serde_json::to_string(&Report::Tune(result))?);
        } else {
            println!(
                "tune: attack power {} wins after {} rounds with {} hit points left, outcome {}",
                result.attack_power,
                result.outcome.rounds,
                result.outcome.remaining_hit_points,
                result.outcome.outcome
            );
        }
    }

    Ok(())
}

/// Runs standard combat, printing the grid between rounds when tracing.
fn run_combat(world: GridWorld, opts: &Options) -> Result<CombatOutcome, SimError> {
    let mut sim = Simulation::with_config(
        world,
        SimConfig {
            max_rounds: opts.max_rounds,
        },
    );
    if opts.trace {
        println!("Initially:\n{}", format_grid(sim.world()));
        sim.run_with_observer(|world, round| {
            println!("After {} rounds:\n{}", round, format_grid(world));
        })
    } else {
        sim.run()
    }
}

/// Parses command-line arguments. Returns `Ok(None)` when help was requested.
fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut opts = Options {
        map: PathBuf::from("input.txt"),
        mode: Mode::Both,
        tuning: TuningConfig::default(),
        max_rounds: None,
        trace: false,
        json: false,
        quiet: false,
    };

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--mode" => {
                let v = value(&mut it, "--mode")?;
                opts.mode = Mode::parse(&v).ok_or_else(|| format!("invalid --mode value: '{}'", v))?;
            }
            "--threads" => opts.tuning.threads = number(&mut it, "--threads")?,
            "--start-power" => opts.tuning.start_power = power(&mut it, "--start-power")?,
            "--max-power" => opts.tuning.max_power = power(&mut it, "--max-power")?,
            "--max-rounds" => opts.max_rounds = Some(number(&mut it, "--max-rounds")?),
            "--trace" => opts.trace = true,
            "--json" => opts.json = true,
            "--quiet" => opts.quiet = true,
            "--help" | "-h" => return Ok(None),
            other if other.starts_with("--") => {
                return Err(format!("Unknown argument: {}", other));
            }
            path => opts.map = PathBuf::from(path),
        }
    }
    Ok(Some(opts))
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    it.next().ok_or_else(|| format!("missing value for {}", flag))
}

fn number<T: std::str::FromStr>(
    it: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, String> {
    let v = value(it, flag)?;
    v.parse()
        .map_err(|_| format!("invalid {} value: '{}'", flag, v))
}

/// Parses an attack power, which must be at least 1.
fn power(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<i32, String> {
    let v: i32 = number(it, flag)?;
    if v < 1 {
        return Err(format!("{} must be at least 1, got {}", flag, v));
    }
    Ok(v)
}

fn print_usage() {
    eprintln!("Usage: bandits [OPTIONS] [MAP]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --mode M          combat, tune, or both (default: both)");
    eprintln!("  --threads N       Worker threads for the tuning search (default: 1)");
    eprintln!("  --start-power N   First attack power to try (default: 4)");
    eprintln!("  --max-power N     Last attack power to try (default: 200)");
    eprintln!("  --max-rounds N    Give up on a combat after N rounds (default: unlimited)");
    eprintln!("  --trace           Print the grid after every completed round");
    eprintln!("  --json            Print results as JSON, one object per line");
    eprintln!("  --quiet           Only log warnings and errors");
    eprintln!("  --help            Show this help");
}
