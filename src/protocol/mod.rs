//! Map text format.
//!
//! Loading the `#`/`.`/`E`/`G` map notation into a grid world and rendering
//! a grid world back to text.

pub mod map;
pub mod render;

pub use map::{load_map, parse_map, MapError};
pub use render::{format_grid, format_map};
