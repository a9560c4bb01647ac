//! Grid world: tiles, the unit roster, and occupancy bookkeeping.
//!
//! Units are stored in an arena indexed by their stable id. Dead units stay
//! in the arena with `alive == false` so ids never shift. A dense
//! position-to-id index gives O(1) occupancy lookups and is updated on every
//! move and removal.

use super::position::{reading_order, Position};
use super::unit::{Faction, Unit, UnitId, DEFAULT_ATTACK_POWER};

/// Terrain of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Open,
    Wall,
}

impl Tile {
    /// Returns the map character for this tile.
    pub const fn map_char(self) -> char {
        match self {
            Tile::Open => '.',
            Tile::Wall => '#',
        }
    }
}

/// Per-faction attack power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPowers {
    powers: [i32; 2],
}

impl Default for AttackPowers {
    fn default() -> Self {
        AttackPowers {
            powers: [DEFAULT_ATTACK_POWER; 2],
        }
    }
}

impl AttackPowers {
    pub fn get(&self, faction: Faction) -> i32 {
        self.powers[faction.index()]
    }

    pub fn set(&mut self, faction: Faction, power: i32) {
        self.powers[faction.index()] = power;
    }
}

/// The complete state of one battle: terrain, units and attack powers.
///
/// Cloning a `GridWorld` yields a fully independent battle, which is how the
/// tuning search reruns the same starting map.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    /// Living occupant of each tile, indexed like `tiles`.
    occupancy: Vec<Option<UnitId>>,
    units: Vec<Unit>,
    attack_powers: AttackPowers,
}

impl GridWorld {
    /// Creates a grid of the given size with every tile open and no units.
    pub fn new(width: usize, height: usize) -> Self {
        GridWorld {
            width,
            height,
            tiles: vec![Tile::Open; width * height],
            occupancy: vec![None; width * height],
            units: Vec::new(),
            attack_powers: AttackPowers::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    /// Returns the terrain at `pos`. Positions off the grid read as walls.
    pub fn tile_at(&self, pos: Position) -> Tile {
        self.index(pos).map_or(Tile::Wall, |i| self.tiles[i])
    }

    /// Sets the terrain at `pos`. Ignored for positions off the grid.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        if let Some(i) = self.index(pos) {
            debug_assert!(
                tile == Tile::Open || self.occupancy[i].is_none(),
                "walling over a unit at {}",
                pos
            );
            self.tiles[i] = tile;
        }
    }

    /// Returns the id of the living unit at `pos`, if any.
    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        self.index(pos).and_then(|i| self.occupancy[i])
    }

    /// Returns true if `pos` is open terrain with no living unit on it.
    pub fn is_free(&self, pos: Position) -> bool {
        match self.index(pos) {
            Some(i) => self.tiles[i] == Tile::Open && self.occupancy[i].is_none(),
            None => false,
        }
    }

    /// Places a new unit at `pos` and returns its id.
    ///
    /// Returns `None` if the tile is a wall, off the grid, or occupied.
    pub fn spawn_unit(&mut self, faction: Faction, pos: Position) -> Option<UnitId> {
        if !self.is_free(pos) {
            return None;
        }
        let i = self.index(pos)?;
        let id = self.units.len();
        self.units.push(Unit::new(id, faction, pos));
        self.occupancy[i] = Some(id);
        Some(id)
    }

    /// Returns the unit with the given id, living or dead.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id]
    }

    /// Applies `damage` to a living unit and returns its remaining hit points.
    ///
    /// Does not remove the unit; callers remove it once hit points drop to zero.
    pub(crate) fn damage_unit(&mut self, id: UnitId, damage: i32) -> i32 {
        let unit = &mut self.units[id];
        debug_assert!(unit.alive, "attacking removed unit {}", id);
        debug_assert!(damage > 0, "damage must be positive, got {}", damage);
        unit.hit_points -= damage;
        unit.hit_points
    }

    /// Every unit ever spawned, in id order, including removed ones.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Iterates over the units that are still alive, in id order.
    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.alive)
    }

    /// Moves a living unit to `new_pos`.
    ///
    /// `new_pos` must be free. Callers guarantee this; it is only checked in
    /// debug builds.
    pub fn move_unit(&mut self, id: UnitId, new_pos: Position) {
        debug_assert!(self.units[id].alive, "moving removed unit {}", id);
        debug_assert!(self.is_free(new_pos), "moving unit {} onto blocked {}", id, new_pos);
        let old_pos = self.units[id].position;
        if let Some(i) = self.index(old_pos) {
            self.occupancy[i] = None;
        }
        if let Some(i) = self.index(new_pos) {
            self.occupancy[i] = Some(id);
        }
        self.units[id].position = new_pos;
    }

    /// Marks a unit as dead and frees its tile.
    pub fn remove_unit(&mut self, id: UnitId) {
        debug_assert!(self.units[id].alive, "removing unit {} twice", id);
        let pos = self.units[id].position;
        if let Some(i) = self.index(pos) {
            if self.occupancy[i] == Some(id) {
                self.occupancy[i] = None;
            }
        }
        self.units[id].alive = false;
    }

    /// Returns the ids of all living units sorted by reading order of position.
    pub fn living_units_in_reading_order(&self) -> Vec<UnitId> {
        let mut order: Vec<&Unit> = self.living_units().collect();
        order.sort_by(|a, b| reading_order(&a.position, &b.position));
        order.into_iter().map(|u| u.id).collect()
    }

    /// Number of living units of a faction.
    pub fn living_count(&self, faction: Faction) -> usize {
        self.living_units().filter(|u| u.faction == faction).count()
    }

    /// Sum of hit points over the living units of a faction.
    pub fn total_hit_points(&self, faction: Faction) -> i32 {
        self.living_units()
            .filter(|u| u.faction == faction)
            .map(|u| u.hit_points)
            .sum()
    }

    /// Returns the faction that alone has living units, if exactly one does.
    pub fn winner(&self) -> Option<Faction> {
        let a = self.living_count(Faction::A);
        let b = self.living_count(Faction::B);
        match (a, b) {
            (0, 0) => None,
            (_, 0) => Some(Faction::A),
            (0, _) => Some(Faction::B),
            _ => None,
        }
    }

    pub fn attack_power(&self, faction: Faction) -> i32 {
        self.attack_powers.get(faction)
    }

    /// Overrides a faction's attack power. Powers below 1 are a caller bug.
    pub fn set_attack_power(&mut self, faction: Faction, power: i32) {
        debug_assert!(power > 0, "attack power must be positive, got {}", power);
        self.attack_powers.set(faction, power);
    }
}
