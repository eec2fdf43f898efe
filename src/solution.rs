//! Tour and solution representation.
//!
//! A tour is a permutation of the city ids `0..N` read as a cycle: the city
//! after the last one is the first one.

use crate::error::Result;
use crate::graph::Graph;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Uniformly random tour over `0..n`.
pub fn random_tour<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (0..n).collect();
    tour.shuffle(rng);
    tour
}

/// Check that `tour` visits every id in `0..n` exactly once.
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

/// Represents a solution to the TSP
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// The tour as a sequence of city ids
    pub tour: Vec<usize>,
    /// Round-trip distance of the tour
    pub distance: u64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a solution from a tour, evaluating its distance
    pub fn from_tour(graph: &Graph, tour: Vec<usize>, algorithm: &str) -> Result<Self> {
        let distance = graph.tour_distance(&tour)?;
        Ok(Solution {
            tour,
            distance,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        })
    }

    /// Check if all cities of the graph are visited exactly once
    pub fn is_complete(&self, graph: &Graph) -> bool {
        is_permutation(&self.tour, graph.city_count())
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Distance: {}", self.distance)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}

/// Snapshot of the search emitted once per annealing iteration.
#[derive(Debug, Clone, Serialize)]
pub struct Progress<'a> {
    /// 1-based iteration index
    pub iteration: usize,
    /// Temperature after this iteration's cooling step
    pub temperature: f64,
    pub current_distance: u64,
    /// Best distance seen so far, never above `current_distance`
    pub best_distance: u64,
    pub current_tour: &'a [usize],
}

impl std::fmt::Display for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Iteration: {}", self.iteration)?;
        writeln!(f, "Temperature: {}", self.temperature)?;
        writeln!(f, "Current Distance: {}", self.current_distance)?;
        writeln!(f, "Current Route: {:?}", self.current_tour)?;
        write!(f, "--------------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_tour_is_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in [0, 1, 2, 9, 50] {
            let tour = random_tour(n, &mut rng);
            assert!(is_permutation(&tour, n), "n = {}", n);
        }
    }

    #[test]
    fn test_random_tour_is_seeded() {
        let a = random_tour(20, &mut ChaCha8Rng::seed_from_u64(3));
        let b = random_tour(20, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_permutation_rejects_bad_tours() {
        assert!(is_permutation(&[2, 0, 1], 3));
        assert!(!is_permutation(&[0, 1, 1], 3));
        assert!(!is_permutation(&[0, 1], 3));
        assert!(!is_permutation(&[0, 1, 3], 3));
    }

    #[test]
    fn test_solution_from_tour() {
        let graph = Graph::build(3, [(0, 1, 2), (1, 2, 3), (2, 0, 4)]).unwrap();
        let sol = Solution::from_tour(&graph, vec![0, 1, 2], "test").unwrap();
        assert_eq!(sol.distance, 9);
        assert!(sol.is_complete(&graph));
        assert!(sol.to_string().contains("Distance: 9"));
    }

    #[test]
    fn test_progress_display() {
        let tour = [1, 0, 2];
        let progress = Progress {
            iteration: 3,
            temperature: 72.9,
            current_distance: 12,
            best_distance: 10,
            current_tour: &tour,
        };
        let text = progress.to_string();
        assert!(text.starts_with("Iteration: 3\n"));
        assert!(text.contains("Current Route: [1, 0, 2]"));
    }
}
