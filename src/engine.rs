//! Simulation driver.
//!
//! Owns one `GridWorld` and plays it round by round. Turn order is captured
//! once at the start of every round from the living roster; units killed
//! mid-round are skipped when their turn comes. A round in which the last
//! enemy falls before every scheduled turn has been taken is not counted.

use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Faction, GridWorld, UnitId};
use crate::movegen::next_step;
use crate::resolve::{attack, has_adjacent_enemy};

/// Errors that stop a simulation before one faction wins.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("no combat after {0} rounds: round limit reached")]
    RoundLimit(usize),

    #[error("the map has no units")]
    NoUnits,
}

/// Settings for a single simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    /// Stop with `SimError::RoundLimit` after this many completed rounds.
    /// `None` runs until one faction is eliminated.
    pub max_rounds: Option<usize>,
}

/// Where the simulation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    /// The last enemy fell before every turn of the round was taken. Terminal:
    /// no further round is played, and `run` records it as `Finished`.
    RoundInterruptedByWin,
    Finished,
}

impl SimState {
    /// True once one faction has won, whether or not the last round completed.
    pub fn is_finished(self) -> bool {
        matches!(self, SimState::RoundInterruptedByWin | SimState::Finished)
    }
}

/// How a call to `step_round` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    /// Every scheduled unit had its turn; the round counts.
    Complete,
    /// A faction was already eliminated when a turn came up; the round does
    /// not count.
    Interrupted,
}

/// Final result of a finished combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatOutcome {
    pub winner: Faction,
    /// Rounds that ran to completion.
    pub rounds: usize,
    /// Hit points left across all surviving units.
    pub remaining_hit_points: i32,
    /// Units of the winning faction still alive.
    pub survivors: usize,
    /// `rounds * remaining_hit_points`.
    pub outcome: i64,
}

/// One battle in progress.
pub struct Simulation {
    world: GridWorld,
    config: SimConfig,
    rounds: usize,
    state: SimState,
}

impl Simulation {
    /// Creates a simulation that runs until one faction wins.
    pub fn new(world: GridWorld) -> Self {
        Self::with_config(world, SimConfig::default())
    }

    pub fn with_config(world: GridWorld, config: SimConfig) -> Self {
        Simulation {
            world,
            config,
            rounds: 0,
            state: SimState::Running,
        }
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    /// Consumes the simulation and returns the grid in its current state.
    pub fn into_world(self) -> GridWorld {
        self.world
    }

    /// Number of completed rounds so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Plays one unit's turn: attack if possible, otherwise move and then
    /// attack if the move brought an enemy into reach.
    fn take_turn(&mut self, id: UnitId) {
        if attack(&mut self.world, id).is_some() {
            return;
        }
        if let Some(step) = next_step(&self.world, id) {
            self.world.move_unit(id, step);
            if has_adjacent_enemy(&self.world, id) {
                attack(&mut self.world, id);
            }
        }
    }

    /// Plays one round.
    pub fn step_round(&mut self) -> RoundResult {
        let order = self.world.living_units_in_reading_order();
        for id in order {
            if self.world.winner().is_some() {
                self.state = SimState::RoundInterruptedByWin;
                debug!(round = self.rounds + 1, "round interrupted by win");
                return RoundResult::Interrupted;
            }
            if !self.world.unit(id).alive {
                continue;
            }
            self.take_turn(id);
        }
        self.rounds += 1;
        if self.world.winner().is_some() {
            self.state = SimState::Finished;
        }
        debug!(round = self.rounds, "round complete");
        RoundResult::Complete
    }

    /// Runs until one faction is eliminated.
    pub fn run(&mut self) -> Result<CombatOutcome, SimError> {
        self.run_with_observer(|_, _| {})
    }

    /// Runs until one faction is eliminated, calling `observer` with the grid
    /// and the completed-round count after every completed round.
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> Result<CombatOutcome, SimError>
    where
        F: FnMut(&GridWorld, usize),
    {
        if self.world.living_units().next().is_none() {
            return Err(SimError::NoUnits);
        }
        while !self.state.is_finished() {
            if let Some(limit) = self.config.max_rounds {
                if self.rounds >= limit {
                    return Err(SimError::RoundLimit(limit));
                }
            }
            if self.step_round() == RoundResult::Complete {
                observer(&self.world, self.rounds);
            }
        }
        self.state = SimState::Finished;
        let outcome = self.outcome().ok_or(SimError::NoUnits)?;
        info!(
            winner = ?outcome.winner,
            rounds = outcome.rounds,
            hit_points = outcome.remaining_hit_points,
            outcome = outcome.outcome,
            "combat finished"
        );
        Ok(outcome)
    }

    /// Returns the outcome if one faction has won.
    pub fn outcome(&self) -> Option<CombatOutcome> {
        let winner = self.world.winner()?;
        let remaining_hit_points = self.world.total_hit_points(winner);
        Some(CombatOutcome {
            winner,
            rounds: self.rounds,
            remaining_hit_points,
            survivors: self.world.living_count(winner),
            outcome: self.rounds as i64 * i64::from(remaining_hit_points),
        })
    }
}

/// Runs a full combat on `world` and returns `rounds * remaining hit points`.
pub fn full_combat(world: GridWorld) -> Result<i64, SimError> {
    Simulation::new(world).run().map(|o| o.outcome)
}
