//! Map text loading.
//!
//! A map is a rectangle of characters, one row per line:
//!
//! - `#` wall
//! - `.` open floor
//! - `E` a faction A unit on open floor
//! - `G` a faction B unit on open floor
//!
//! Surrounding whitespace on each line is ignored, as are blank lines before
//! the first row and after the last. Unit ids are assigned in reading order.

use std::fs;
use std::path::Path;

use crate::board::{Faction, GridWorld, Position, Tile};

/// Errors that can occur while loading a map.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map is empty")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile '{ch}' at ({x},{y})")]
    UnknownTile { ch: char, x: usize, y: usize },

    #[error("failed to read map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parses map text into a grid world with default attack powers.
pub fn parse_map(text: &str) -> Result<GridWorld, MapError> {
    let mut rows: Vec<&str> = text.lines().map(str::trim).collect();
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    let first = rows.iter().position(|r| !r.is_empty()).ok_or(MapError::Empty)?;
    let rows = &rows[first..];

    let width = rows[0].chars().count();
    let height = rows.len();
    let mut world = GridWorld::new(width, height);

    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(MapError::Ragged {
                row: y,
                expected: width,
                found,
            });
        }
        for (x, ch) in row.chars().enumerate() {
            let pos = Position::new(x, y);
            match ch {
                '#' => world.set_tile(pos, Tile::Wall),
                '.' => {}
                _ => {
                    let faction =
                        Faction::from_map_char(ch).ok_or(MapError::UnknownTile { ch, x, y })?;
                    // The tile is open and has not been visited yet, so this always succeeds.
                    world.spawn_unit(faction, pos);
                }
            }
        }
    }

    Ok(world)
}

/// Reads and parses a map file.
pub fn load_map(path: &Path) -> Result<GridWorld, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_map(&text)
}
