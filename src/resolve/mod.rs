//! Combat resolution.
//!
//! Chooses which adjacent enemy a unit attacks and applies the damage,
//! removing units that die.

pub mod combat;

pub use combat::{adjacent_enemies, attack, has_adjacent_enemy, AttackReport};
