//! Move generation.
//!
//! Decides where a unit steps on its turn using breadth-first distances and
//! reading-order tie-breaks.

pub mod pathfinder;

pub use pathfinder::{choose_target, distances_from, next_step, target_squares, DistanceMap};
