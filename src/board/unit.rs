//! Combatants and their factions.
//!
//! A unit is created once when the map is loaded and keeps its id for the
//! whole simulation, even after it dies.

use std::cmp::Ordering;

use serde::Serialize;

use super::position::{reading_order, Position};

/// Hit points every unit starts with.
pub const INITIAL_HIT_POINTS: i32 = 200;

/// Attack power of both factions unless overridden.
pub const DEFAULT_ATTACK_POWER: i32 = 3;

/// One of the two sides in combat.
///
/// Faction A is written `E` in map text, faction B is written `G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Faction {
    A,
    B,
}

impl Faction {
    /// Returns the opposing faction.
    pub const fn enemy(self) -> Faction {
        match self {
            Faction::A => Faction::B,
            Faction::B => Faction::A,
        }
    }

    /// Returns the map character for a unit of this faction.
    pub const fn map_char(self) -> char {
        match self {
            Faction::A => 'E',
            Faction::B => 'G',
        }
    }

    /// Parses a faction from its map character.
    pub fn from_map_char(c: char) -> Option<Faction> {
        match c {
            'E' => Some(Faction::A),
            'G' => Some(Faction::B),
            _ => None,
        }
    }

    /// Index into per-faction arrays.
    pub const fn index(self) -> usize {
        match self {
            Faction::A => 0,
            Faction::B => 1,
        }
    }
}

/// Stable identifier of a unit: its slot in the roster.
pub type UnitId = usize;

/// A combatant on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub faction: Faction,
    pub position: Position,
    pub hit_points: i32,
    pub alive: bool,
}

impl Unit {
    /// Creates a living unit with full hit points.
    pub fn new(id: UnitId, faction: Faction, position: Position) -> Self {
        Unit {
            id,
            faction,
            position,
            hit_points: INITIAL_HIT_POINTS,
            alive: true,
        }
    }

    /// Returns true if `other` belongs to the opposing faction.
    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.faction != other.faction
    }
}

/// Orders combat targets by remaining hit points, then by reading order.
pub fn by_hit_points_then_reading_order(a: &Unit, b: &Unit) -> Ordering {
    a.hit_points
        .cmp(&b.hit_points)
        .then_with(|| reading_order(&a.position, &b.position))
}
