//! Beverage Bandits combat engine library.
//!
//! Exposes the board representation, movement, combat resolution, the
//! round-by-round simulation driver, the attack-power search, and the map
//! text format for use by integration tests and the binary entry point.

pub mod board;
pub mod engine;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod search;
