//! Outer parameter search.
//!
//! Reruns whole combats with increasing attack power for faction A until it
//! wins without casualties.

pub mod tuning;

pub use tuning::{run_trial, tune_attack_power, Trial, TuneError, TuningConfig, TuningResult};
