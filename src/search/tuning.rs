//! Attack-power tuning.
//!
//! Finds the smallest attack power for faction A that lets it win without
//! losing a single unit. Every candidate power is tried on a fresh clone of
//! the starting grid, so trials share no state and can run in parallel.
//!
//! The parallel search evaluates consecutive batches of candidate powers and
//! stops at the first batch containing a qualifying power, returning the
//! smallest one in it. That is the same answer the sequential search gives.

use serde::Serialize;
use tracing::info;

use crate::board::{Faction, GridWorld, DEFAULT_ATTACK_POWER, INITIAL_HIT_POINTS};
use crate::engine::{CombatOutcome, SimConfig, SimError, Simulation};

/// Errors from the tuning search.
#[derive(Debug, thiserror::Error)]
pub enum TuneError {
    #[error("attack power must be at least 1, got start {start}")]
    InvalidRange { start: i32, max: i32 },

    #[error("no attack power in {start}..={max} wins without casualties")]
    Exhausted { start: i32, max: i32 },

    #[error("trial failed: {0}")]
    Sim(#[from] SimError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for the tuning search.
#[derive(Debug, Clone)]
pub struct TuningConfig {
    /// First attack power to try.
    pub start_power: i32,
    /// Last attack power to try before giving up.
    pub max_power: i32,
    /// Worker threads; 1 or less searches sequentially.
    pub threads: usize,
    /// Round limit for each trial.
    pub max_rounds: Option<usize>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            start_power: DEFAULT_ATTACK_POWER + 1,
            // Past this every hit is already a one-hit kill.
            max_power: INITIAL_HIT_POINTS,
            threads: 1,
            max_rounds: None,
        }
    }
}

/// The smallest qualifying attack power and the combat it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TuningResult {
    pub attack_power: i32,
    pub outcome: CombatOutcome,
}

/// Result of one full combat at a candidate attack power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub attack_power: i32,
    pub outcome: CombatOutcome,
    /// Faction A units lost during the combat.
    pub casualties: usize,
}

impl Trial {
    /// True if faction A won and lost nobody.
    pub fn is_flawless(&self) -> bool {
        self.outcome.winner == Faction::A && self.casualties == 0
    }
}

/// Runs one complete combat from `initial` with faction A at `attack_power`.
pub fn run_trial(
    initial: &GridWorld,
    attack_power: i32,
    max_rounds: Option<usize>,
) -> Result<Trial, SimError> {
    let mut world = initial.clone();
    world.set_attack_power(Faction::A, attack_power);
    let starting = world.living_count(Faction::A);

    let mut sim = Simulation::with_config(world, SimConfig { max_rounds });
    let outcome = sim.run()?;
    let casualties = starting - sim.world().living_count(Faction::A);
    info!(
        attack_power,
        winner = ?outcome.winner,
        casualties,
        outcome = outcome.outcome,
        "trial finished"
    );
    Ok(Trial {
        attack_power,
        outcome,
        casualties,
    })
}

/// Searches for the smallest attack power giving faction A a flawless win.
///
/// Dispatches to a rayon-parallel search when `config.threads > 1`.
/// A `start_power` below 1 is rejected with `TuneError::InvalidRange`.
pub fn tune_attack_power(
    initial: &GridWorld,
    config: &TuningConfig,
) -> Result<TuningResult, TuneError> {
    if config.start_power < 1 {
        return Err(TuneError::InvalidRange {
            start: config.start_power,
            max: config.max_power,
        });
    }
    let result = if config.threads > 1 {
        tune_parallel(initial, config)
    } else {
        tune_sequential(initial, config)
    }?;
    info!(
        attack_power = result.attack_power,
        outcome = result.outcome.outcome,
        "attack power found"
    );
    Ok(result)
}

/// Tries powers one at a time in increasing order.
fn tune_sequential(initial: &GridWorld, config: &TuningConfig) -> Result<TuningResult, TuneError> {
    for power in config.start_power..=config.max_power {
        let trial = run_trial(initial, power, config.max_rounds)?;
        if trial.is_flawless() {
            return Ok(TuningResult {
                attack_power: power,
                outcome: trial.outcome,
            });
        }
    }
    Err(TuneError::Exhausted {
        start: config.start_power,
        max: config.max_power,
    })
}

/// Tries batches of `config.threads` consecutive powers concurrently.
fn tune_parallel(initial: &GridWorld, config: &TuningConfig) -> Result<TuningResult, TuneError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let batch = i32::try_from(config.threads).unwrap_or(i32::MAX);

    pool.install(|| {
        let mut low = config.start_power;
        while low <= config.max_power {
            let high = low.saturating_add(batch - 1).min(config.max_power);
            let trials: Vec<Result<Trial, SimError>> = (low..=high)
                .into_par_iter()
                .map(|power| run_trial(initial, power, config.max_rounds))
                .collect();
            if let Some(trial) = first_flawless(trials)? {
                return Ok(TuningResult {
                    attack_power: trial.attack_power,
                    outcome: trial.outcome,
                });
            }
            match high.checked_add(1) {
                Some(next) => low = next,
                None => break,
            }
        }
        Err(TuneError::Exhausted {
            start: config.start_power,
            max: config.max_power,
        })
    })
}

/// Scans a batch in power order the way the sequential search would: the
/// first flawless trial wins, unless an earlier trial failed.
fn first_flawless(trials: Vec<Result<Trial, SimError>>) -> Result<Option<Trial>, SimError> {
    for trial in trials {
        let trial = trial?;
        if trial.is_flawless() {
            return Ok(Some(trial));
        }
    }
    Ok(None)
}
