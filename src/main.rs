//! TSP Annealer - Command Line Interface
//!
//! Reads an edge-list graph, solves the TSP over it with simulated annealing
//! and prints the progress of the search and the best route found.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tsp_annealer::graph::Graph;
use tsp_annealer::heuristics::SimulatedAnnealing;
use tsp_annealer::solution::{random_tour, Progress, Solution};

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tsp-annealer")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Solve a small TSP instance with simulated annealing")]
struct Cli {
    /// Edge-list file: city count on the first line, then `city_a city_b weight` lines
    file: PathBuf,

    /// Random seed (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial temperature
    #[arg(long, default_value = "100.0")]
    initial_temp: f64,

    /// The search stops once the temperature drops to this value
    #[arg(long, default_value = "0.001")]
    final_temp: f64,

    /// Multiplicative cooling rate applied after every iteration
    #[arg(long, default_value = "0.9")]
    cooling_rate: f64,

    /// Wait for Enter before solving
    #[arg(long)]
    pause: bool,

    /// Do not print per-iteration progress
    #[arg(short, long)]
    quiet: bool,

    /// Write the final result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print graph statistics
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    println!("Reading the file {:?}...", cli.file);
    let graph = Graph::from_file(&cli.file)?;
    println!("Data preparation completed!\n");

    if cli.verbose {
        println!("{}", graph.statistics());
    }
    if !graph.is_complete() {
        log::warn!("Graph is not complete; the run fails as soon as a tour uses a missing edge");
    }

    if cli.pause {
        print!("Press enter to continue: ");
        io::stdout().flush()?;
        wait_for_enter()?;
    }

    println!("Cities and Distances:");
    print_city_distances(&graph);

    let sa = SimulatedAnnealing::with_params(cli.initial_temp, cli.final_temp, cli.cooling_rate);
    log::info!("Planned iterations: {}", sa.planned_iterations()?);

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    println!("Solving TSP using simulated annealing algorithm...");
    let initial_tour = random_tour(graph.city_count(), &mut rng);
    let initial = Solution::from_tour(&graph, initial_tour, "Random")?;
    println!("Initial Route: {:?}", initial.tour);
    println!("Initial Distance: {}", initial.distance);

    let quiet = cli.quiet;
    let outcome = sa.run(&graph, initial.tour, &mut rng, |progress: &Progress<'_>| {
        if !quiet {
            println!("{}", progress);
        }
    })?;

    if !outcome.best.is_complete(&graph) {
        log::warn!("Best route does not visit every city exactly once");
    }

    println!("\n========== Results ==========");
    println!("Best route: {:?}", outcome.best.tour);
    println!("Distance: {}", outcome.best.distance);
    println!(
        "Iterations: {} (accepted {}, improving {})",
        outcome.iterations, outcome.accepted_moves, outcome.improving_moves
    );
    println!("Time: {:.4}s", outcome.best.computation_time);

    println!("\nCities and Distances in Best Route:");
    for (from, to, distance) in graph.route_legs(&outcome.best.tour)? {
        println!("From City {} to City {}: Distance = {}", from, to, distance);
    }

    if let Some(out_path) = &cli.output {
        write_json(out_path, &outcome)?;
        println!("\nResult saved to {:?}", out_path);
    }

    Ok(())
}

fn print_city_distances(graph: &Graph) {
    for city in graph.cities() {
        let distances: Vec<String> = city
            .neighbors()
            .iter()
            .map(|(id, w)| format!("{}={}", id, w))
            .collect();
        println!("City ID: {}", city.id);
        println!("Distances: {{{}}}", distances.join(", "));
    }
}

fn wait_for_enter() -> io::Result<()> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn write_json<T: serde::Serialize>(
    path: &Path,
    value: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
