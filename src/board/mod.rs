//! Board representation.
//!
//! Contains positions and reading order, units and factions, and the grid
//! world that owns the terrain and the unit roster.

pub mod grid;
pub mod position;
pub mod unit;

pub use grid::{AttackPowers, GridWorld, Tile};
pub use position::{reading_order, Position};
pub use unit::{
    by_hit_points_then_reading_order, Faction, Unit, UnitId, DEFAULT_ATTACK_POWER,
    INITIAL_HIT_POINTS,
};
