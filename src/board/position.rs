//! Grid coordinates and reading order.
//!
//! Positions are `(x, y)` pairs with `y` growing downwards. Reading order is
//! the total order used for every tie-break in the engine: top to bottom,
//! then left to right.

use std::cmp::Ordering;
use std::fmt;

/// A tile coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    /// Creates a position from its column and row.
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Returns the orthogonal neighbours in reading order: up, left, right, down.
    ///
    /// Neighbours that would fall off the top or left edge are omitted.
    /// Neighbours past the right or bottom edge are returned and read as
    /// walls by the grid.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        let up = self.y.checked_sub(1).map(|y| Position::new(self.x, y));
        let left = self.x.checked_sub(1).map(|x| Position::new(x, self.y));
        let right = Some(Position::new(self.x + 1, self.y));
        let down = Some(Position::new(self.x, self.y + 1));
        [up, left, right, down].into_iter().flatten()
    }

    /// Returns true if `other` is one step away horizontally or vertically.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Compares two positions by row, then by column.
pub fn reading_order(a: &Position, b: &Position) -> Ordering {
    a.y.cmp(&b.y).then(a.x.cmp(&b.x))
}
