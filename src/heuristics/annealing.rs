//! Simulated annealing over tours.
//!
//! The search starts from a random tour and at every iteration swaps two
//! random positions of the current tour. Improving candidates are always
//! accepted; worsening ones are accepted with the Metropolis probability
//! `exp(-delta / T)`. The temperature is multiplied by the cooling rate after
//! every iteration, so the number of iterations depends only on the schedule.

use crate::error::{Result, TspError};
use crate::graph::Graph;
use crate::solution::{random_tour, Progress, Solution};
use rand::Rng;
use serde::Serialize;
use std::time::Instant;

/// Simulated Annealing
///
/// Geometric cooling, one 2-position swap per temperature step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedAnnealing {
    /// Initial temperature
    pub initial_temp: f64,
    /// The loop runs while the temperature is above this value
    pub final_temp: f64,
    /// Cooling rate in (0, 1)
    pub cooling_rate: f64,
}

/// Everything a single annealing run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnnealingOutcome {
    pub initial_tour: Vec<usize>,
    pub initial_distance: u64,
    /// Best tour seen and its distance
    pub best: Solution,
    pub iterations: usize,
    /// Accepted moves, improving ones included
    pub accepted_moves: usize,
    pub improving_moves: usize,
    pub final_temperature: f64,
}

impl SimulatedAnnealing {
    pub fn new() -> Self {
        SimulatedAnnealing {
            initial_temp: 100.0,
            final_temp: 0.001,
            cooling_rate: 0.9,
        }
    }

    pub fn with_params(initial_temp: f64, final_temp: f64, cooling_rate: f64) -> Self {
        SimulatedAnnealing {
            initial_temp,
            final_temp,
            cooling_rate,
        }
    }

    /// Reject schedules that are meaningless or would never terminate.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temp > 0.0 && self.initial_temp.is_finite()) {
            return Err(TspError::InvalidParameter {
                name: "initial_temp",
                value: self.initial_temp,
            });
        }
        if !(self.final_temp > 0.0 && self.final_temp.is_finite()) {
            return Err(TspError::InvalidParameter {
                name: "final_temp",
                value: self.final_temp,
            });
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(TspError::InvalidParameter {
                name: "cooling_rate",
                value: self.cooling_rate,
            });
        }
        Ok(())
    }

    /// Number of iterations the loop performs for this schedule.
    ///
    /// Replays the cooling in floating point so the count matches the loop
    /// exactly, which can differ by one from the closed form
    /// `ceil(ln(final / initial) / ln(rate))` near integer boundaries.
    pub fn planned_iterations(&self) -> Result<usize> {
        self.validate()?;
        let mut temp = self.initial_temp;
        let mut iterations = 0;
        while temp > self.final_temp {
            temp *= self.cooling_rate;
            iterations += 1;
        }
        Ok(iterations)
    }

    /// Metropolis acceptance test.
    ///
    /// Draws from `rng` only when the move does not improve.
    fn accept_move<R: Rng>(delta: i128, temp: f64, rng: &mut R) -> bool {
        delta < 0 || rng.gen::<f64>() < (-(delta as f64) / temp).exp()
    }

    /// Copy of `tour` with two positions, drawn independently, swapped.
    /// Both draws may hit the same position, which leaves the tour unchanged.
    fn generate_neighbor<R: Rng>(tour: &[usize], rng: &mut R) -> Vec<usize> {
        let mut candidate = tour.to_vec();
        let n = candidate.len();
        if n > 0 {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            candidate.swap(i, j);
        }
        candidate
    }

    /// Run from a uniformly random tour over the graph's cities.
    pub fn solve<R, F>(&self, graph: &Graph, rng: &mut R, observer: F) -> Result<AnnealingOutcome>
    where
        R: Rng,
        F: FnMut(&Progress<'_>),
    {
        let initial_tour = random_tour(graph.city_count(), rng);
        self.run(graph, initial_tour, rng, observer)
    }

    /// Run from a given initial tour.
    ///
    /// `observer` receives one [`Progress`] record per iteration. The run
    /// aborts with [`TspError::NeighborNotFound`] as soon as any evaluated
    /// tour places two unconnected cities next to each other.
    pub fn run<R, F>(
        &self,
        graph: &Graph,
        initial_tour: Vec<usize>,
        rng: &mut R,
        mut observer: F,
    ) -> Result<AnnealingOutcome>
    where
        R: Rng,
        F: FnMut(&Progress<'_>),
    {
        self.validate()?;
        let start = Instant::now();

        let initial_distance = graph.tour_distance(&initial_tour)?;
        log::info!(
            "Starting simulated annealing: {} cities, initial distance {}, T0={}, Tmin={}, rate={}",
            initial_tour.len(),
            initial_distance,
            self.initial_temp,
            self.final_temp,
            self.cooling_rate
        );

        let mut current_tour = initial_tour.clone();
        let mut current_distance = initial_distance;
        let mut best_tour = current_tour.clone();
        let mut best_distance = current_distance;

        let mut temp = self.initial_temp;
        let mut iterations = 0;
        let mut accepted_moves = 0;
        let mut improving_moves = 0;

        while temp > self.final_temp {
            iterations += 1;

            let candidate = Self::generate_neighbor(&current_tour, rng);
            let candidate_distance = graph.tour_distance(&candidate)?;
            let delta = i128::from(candidate_distance) - i128::from(current_distance);

            if delta < 0 {
                improving_moves += 1;
            }
            if Self::accept_move(delta, temp, rng) {
                current_tour = candidate;
                current_distance = candidate_distance;
                accepted_moves += 1;

                if current_distance < best_distance {
                    best_tour = current_tour.clone();
                    best_distance = current_distance;
                    log::debug!("Iteration {}: new best distance {}", iterations, best_distance);
                }
            }

            temp *= self.cooling_rate;

            let progress = Progress {
                iteration: iterations,
                temperature: temp,
                current_distance,
                best_distance,
                current_tour: &current_tour,
            };
            log::trace!(
                "Iteration {}: T={:.6}, current={}, best={}",
                iterations,
                temp,
                current_distance,
                best_distance
            );
            observer(&progress);
        }

        let elapsed = start.elapsed().as_secs_f64();
        log::info!(
            "Simulated annealing finished after {} iterations in {:.4}s: best distance {}",
            iterations,
            elapsed,
            best_distance
        );

        Ok(AnnealingOutcome {
            initial_tour,
            initial_distance,
            best: Solution {
                tour: best_tour,
                distance: best_distance,
                algorithm: "SimulatedAnnealing".to_string(),
                computation_time: elapsed,
                iterations: Some(iterations),
            },
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temp,
        })
    }
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}
