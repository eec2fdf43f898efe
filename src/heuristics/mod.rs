//! Heuristics module for the TSP.
//!
//! This module exports the improvement heuristics.

pub mod annealing;

pub use annealing::*;
