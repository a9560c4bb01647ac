//! Movement: choosing where a unit steps next.
//!
//! A unit walks toward the closest free square next to any enemy. Distances
//! are unweighted BFS distances over free tiles (open and unoccupied). Every
//! tie is broken by reading order, applied explicitly when candidates are
//! compared rather than relied on through queue order.
//!
//! Two searches are needed per move. The first, from the unit, picks the
//! target square. The second, from the target square, ranks the unit's free
//! neighbours so the step taken is the first step of the reading-order-first
//! shortest path.

use std::collections::VecDeque;

use crate::board::{reading_order, GridWorld, Position, UnitId};
use crate::resolve::combat::has_adjacent_enemy;

/// BFS distances from a single start position.
#[derive(Debug, Clone)]
pub struct DistanceMap {
    width: usize,
    height: usize,
    dist: Vec<Option<usize>>,
}

impl DistanceMap {
    /// Distance from the start to `pos`, or `None` if unreachable.
    pub fn get(&self, pos: Position) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            self.dist[pos.y * self.width + pos.x]
        } else {
            None
        }
    }

    fn set(&mut self, pos: Position, d: usize) {
        self.dist[pos.y * self.width + pos.x] = Some(d);
    }
}

/// Breadth-first distances from `start` over free tiles.
///
/// The start tile itself may be occupied (it is usually the mover's own
/// square); every other tile on a path must be free.
pub fn distances_from(world: &GridWorld, start: Position) -> DistanceMap {
    let mut map = DistanceMap {
        width: world.width(),
        height: world.height(),
        dist: vec![None; world.width() * world.height()],
    };
    if start.x >= map.width || start.y >= map.height {
        return map;
    }
    map.set(start, 0);

    let mut frontier = VecDeque::new();
    frontier.push_back(start);
    while let Some(current) = frontier.pop_front() {
        let d = map.get(current).unwrap_or(0);
        for next in current.neighbors() {
            if world.is_free(next) && map.get(next).is_none() {
                map.set(next, d + 1);
                frontier.push_back(next);
            }
        }
    }
    map
}

/// Free squares orthogonally adjacent to any living enemy of `id`, in
/// reading order and without duplicates.
pub fn target_squares(world: &GridWorld, id: UnitId) -> Vec<Position> {
    let mover = world.unit(id);
    let mut squares: Vec<Position> = world
        .living_units()
        .filter(|u| u.is_enemy_of(mover))
        .flat_map(|u| u.position.neighbors())
        .filter(|&p| world.is_free(p))
        .collect();
    squares.sort_by(reading_order);
    squares.dedup();
    squares
}

/// Picks the reachable target square nearest to `id`, reading order first on
/// ties. Returns the square and its distance.
pub fn choose_target(world: &GridWorld, id: UnitId) -> Option<(Position, usize)> {
    let squares = target_squares(world, id);
    if squares.is_empty() {
        return None;
    }
    let from_unit = distances_from(world, world.unit(id).position);
    squares
        .into_iter()
        .filter_map(|p| from_unit.get(p).map(|d| (p, d)))
        .min_by(|(pa, da), (pb, db)| da.cmp(db).then_with(|| reading_order(pa, pb)))
}

/// Returns the square `id` should step onto this turn, or `None` to stay.
///
/// Units already next to an enemy never move; they fight instead.
pub fn next_step(world: &GridWorld, id: UnitId) -> Option<Position> {
    if has_adjacent_enemy(world, id) {
        return None;
    }
    let (target, _) = choose_target(world, id)?;
    let to_target = distances_from(world, target);
    world
        .unit(id)
        .position
        .neighbors()
        .filter(|&p| world.is_free(p))
        .filter_map(|p| to_target.get(p).map(|d| (p, d)))
        .min_by(|(pa, da), (pb, db)| da.cmp(db).then_with(|| reading_order(pa, pb)))
        .map(|(p, _)| p)
}
