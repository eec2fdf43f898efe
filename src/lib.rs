//! TSP Annealer Library
//!
//! Solves small Traveling Salesman Problem instances with simulated annealing.
//!
//! # Features
//!
//! - Edge-list parsing into a weighted, possibly incomplete, undirected graph
//! - Round-trip tour evaluation that fails fast on missing edges
//! - Simulated annealing with geometric cooling, random 2-position swaps and
//!   the Metropolis acceptance rule, driven by an injected random generator
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tsp_annealer::graph::Graph;
//! use tsp_annealer::heuristics::SimulatedAnnealing;
//!
//! let graph = Graph::parse("3\n0 1 5\n1 2 6\n2 0 7\n").unwrap();
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let sa = SimulatedAnnealing::new();
//! let outcome = sa.solve(&graph, &mut rng, |_| {}).unwrap();
//!
//! assert_eq!(outcome.iterations, 110);
//! assert_eq!(outcome.best.distance, 18);
//! ```

pub mod error;
pub mod graph;
pub mod solution;
pub mod heuristics;

pub use error::{Result, TspError};
pub use graph::Graph;
pub use solution::Solution;
