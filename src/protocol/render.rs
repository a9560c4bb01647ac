//! Text rendering of a grid world.
//!
//! `format_map` produces the same notation `parse_map` reads.
//! `format_grid` appends each row's units and their hit points, e.g.
//! `#G.E#   G(200), E(197)`.

use crate::board::{reading_order, GridWorld, Position, Unit};

/// Returns the character for the tile or living unit at `pos`.
fn cell_char(world: &GridWorld, pos: Position) -> char {
    match world.unit_at(pos) {
        Some(id) => world.unit(id).faction.map_char(),
        None => world.tile_at(pos).map_char(),
    }
}

/// Formats the grid as map text, one newline-terminated line per row.
pub fn format_map(world: &GridWorld) -> String {
    let mut out = String::with_capacity((world.width() + 1) * world.height());
    for y in 0..world.height() {
        for x in 0..world.width() {
            out.push(cell_char(world, Position::new(x, y)));
        }
        out.push('\n');
    }
    out
}

/// Formats the grid with a hit-point summary after each row that has units.
pub fn format_grid(world: &GridWorld) -> String {
    let mut living: Vec<&Unit> = world.living_units().collect();
    living.sort_by(|a, b| reading_order(&a.position, &b.position));

    let mut out = String::new();
    let mut next = 0;
    for y in 0..world.height() {
        for x in 0..world.width() {
            out.push(cell_char(world, Position::new(x, y)));
        }
        let start = next;
        while next < living.len() && living[next].position.y == y {
            next += 1;
        }
        if next > start {
            let summary: Vec<String> = living[start..next]
                .iter()
                .map(|u| format!("{}({})", u.faction.map_char(), u.hit_points))
                .collect();
            out.push_str("   ");
            out.push_str(&summary.join(", "));
        }
        out.push('\n');
    }
    out
}
