//! Module for parsing and representing weighted city graphs.
//!
//! Input is a plain edge list: the first line holds the city count `N`, every
//! following line holds `city_a city_b weight`. Edges are undirected and stored
//! on both endpoints. The graph is not required to be complete, so a distance
//! query between two unconnected cities is an error rather than a large cost.

use crate::error::{Result, TspError};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// An undirected weighted edge record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: u32,
}

impl Edge {
    pub fn new(a: usize, b: usize, weight: u32) -> Self {
        Edge { a, b, weight }
    }
}

impl From<(usize, usize, u32)> for Edge {
    fn from((a, b, weight): (usize, usize, u32)) -> Self {
        Edge::new(a, b, weight)
    }
}

/// A city and the distances to its registered neighbors
#[derive(Debug, Clone, Serialize)]
pub struct City {
    /// City identifier, dense in `[0, N)`
    pub id: usize,
    distances: HashMap<usize, u32>,
}

impl City {
    pub fn new(id: usize) -> Self {
        City {
            id,
            distances: HashMap::new(),
        }
    }

    /// Register (or overwrite) the distance to `neighbor`.
    fn add_neighbor(&mut self, neighbor: usize, weight: u32) {
        self.distances.insert(neighbor, weight);
    }

    /// Distance to `neighbor`, if an edge was registered.
    pub fn distance_to(&self, neighbor: usize) -> Option<u64> {
        self.distances.get(&neighbor).map(|&w| u64::from(w))
    }

    /// Neighbors and their distances, ordered by neighbor id.
    pub fn neighbors(&self) -> Vec<(usize, u64)> {
        let mut neighbors: Vec<(usize, u64)> =
            self.distances.iter().map(|(&id, &w)| (id, u64::from(w))).collect();
        neighbors.sort_unstable_by_key(|&(id, _)| id);
        neighbors
    }

    pub fn degree(&self) -> usize {
        self.distances.len()
    }
}

/// A weighted undirected graph over cities `0..N`.
///
/// Cities are stored in a vector indexed by id. A slot stays empty until an
/// edge references that city. After construction the graph is read-only.
#[derive(Debug, Clone)]
pub struct Graph {
    declared_count: usize,
    cities: Vec<Option<City>>,
}

impl Graph {
    /// Build a graph from edge records.
    ///
    /// Each edge is registered on both endpoints; if the same pair appears
    /// twice the later weight wins. Fails with [`TspError::InvalidIndex`] on
    /// the first edge that references a city outside `[0, city_count)`.
    pub fn build<I>(city_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, u32)>,
    {
        let mut graph = Graph::with_capacity(city_count);
        for record in edges {
            graph.add_edge(Edge::from(record))?;
        }
        Ok(graph)
    }

    fn with_capacity(city_count: usize) -> Self {
        Graph {
            declared_count: city_count,
            cities: vec![None; city_count],
        }
    }

    fn add_edge(&mut self, edge: Edge) -> Result<()> {
        self.check_index(edge.a)?;
        self.check_index(edge.b)?;

        self.city_entry(edge.a).add_neighbor(edge.b, edge.weight);
        self.city_entry(edge.b).add_neighbor(edge.a, edge.weight);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.declared_count {
            Ok(())
        } else {
            Err(TspError::InvalidIndex {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                city_count: self.declared_count,
            })
        }
    }

    /// Look up or create the city for a validated index.
    fn city_entry(&mut self, id: usize) -> &mut City {
        self.cities[id].get_or_insert_with(|| City::new(id))
    }

    /// Parse a graph from the lines of an edge-list description.
    ///
    /// Line 0 is the city count. Every later line must have exactly three
    /// whitespace-separated integers. Line numbers in errors are indices into
    /// `lines`, so the first edge line is line 1.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let (header, edge_lines) = lines.split_first().ok_or(TspError::MissingHeader)?;
        let header = header.as_ref().trim();
        let city_count: usize = header.parse().map_err(|_| TspError::InvalidHeader {
            token: header.to_string(),
        })?;

        let mut graph = Graph::with_capacity(city_count);
        for (offset, line) in edge_lines.iter().enumerate() {
            let edge = parse_edge(line.as_ref(), offset + 1, city_count)?;
            graph.add_edge(edge)?;
        }

        log::debug!(
            "Parsed graph: {} declared cities, {} registered, {} edges",
            city_count,
            graph.city_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Parse a graph from an in-memory edge-list description.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();
        Self::from_lines(&lines)
    }

    /// Read and parse an edge-list file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TspError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Distance of the edge between `city` and `neighbor`.
    #[inline]
    pub fn distance(&self, city: usize, neighbor: usize) -> Result<u64> {
        self.city(city)
            .and_then(|c| c.distance_to(neighbor))
            .ok_or(TspError::NeighborNotFound { city, neighbor })
    }

    /// Round-trip distance of a tour, including the leg from the last city
    /// back to the first.
    pub fn tour_distance(&self, tour: &[usize]) -> Result<u64> {
        tour.iter()
            .zip(tour.iter().cycle().skip(1))
            .try_fold(0u64, |total, (&a, &b)| {
                total
                    .checked_add(self.distance(a, b)?)
                    .ok_or(TspError::DistanceOverflow { legs: tour.len() })
            })
    }

    /// Every leg of a tour as `(from, to, distance)`, wraparound included.
    pub fn route_legs(&self, tour: &[usize]) -> Result<Vec<(usize, usize, u64)>> {
        tour.iter()
            .zip(tour.iter().cycle().skip(1))
            .map(|(&a, &b)| Ok((a, b, self.distance(a, b)?)))
            .collect()
    }

    pub fn city(&self, id: usize) -> Option<&City> {
        self.cities.get(id).and_then(Option::as_ref)
    }

    /// Registered cities in id order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter().flatten()
    }

    /// Number of distinct cities referenced by at least one edge.
    pub fn city_count(&self) -> usize {
        self.cities().count()
    }

    /// The city count given on the header line.
    pub fn declared_count(&self) -> usize {
        self.declared_count
    }

    /// Number of distinct undirected edges (self-loops count once).
    pub fn edge_count(&self) -> usize {
        self.cities()
            .map(|c| c.distances.keys().filter(|&&n| n >= c.id).count())
            .sum()
    }

    /// Whether every declared city has an edge to every other declared city.
    pub fn is_complete(&self) -> bool {
        let n = self.declared_count;
        (0..n).all(|i| {
            self.city(i)
                .map(|c| (0..n).filter(|&j| j != i).all(|j| c.distance_to(j).is_some()))
                .unwrap_or(n == 1)
        })
    }

    /// Get statistics about the graph
    pub fn statistics(&self) -> GraphStatistics {
        let weights: Vec<u64> = self
            .cities()
            .flat_map(|c| {
                c.distances
                    .iter()
                    .filter(move |&(&n, _)| n >= c.id)
                    .map(|(_, &w)| u64::from(w))
            })
            .collect();

        let avg_weight = if weights.is_empty() {
            0.0
        } else {
            weights.iter().sum::<u64>() as f64 / weights.len() as f64
        };

        GraphStatistics {
            declared_count: self.declared_count,
            city_count: self.city_count(),
            edge_count: weights.len(),
            complete: self.is_complete(),
            min_weight: weights.iter().copied().min(),
            max_weight: weights.iter().copied().max(),
            avg_weight,
        }
    }
}

fn parse_edge(line: &str, line_no: usize, city_count: usize) -> Result<Edge> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(TspError::Format {
            line: line_no,
            found: fields.len(),
        });
    }

    let a = parse_index(fields[0], line_no, city_count)?;
    let b = parse_index(fields[1], line_no, city_count)?;
    let weight: u32 = fields[2].parse().map_err(|_| TspError::InvalidNumber {
        line: line_no,
        token: fields[2].to_string(),
    })?;

    Ok(Edge::new(a, b, weight))
}

fn parse_index(token: &str, line_no: usize, city_count: usize) -> Result<usize> {
    let index: i64 = token.parse().map_err(|_| TspError::InvalidNumber {
        line: line_no,
        token: token.to_string(),
    })?;
    usize::try_from(index).map_err(|_| TspError::InvalidIndex { index, city_count })
}

/// Statistics about a graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphStatistics {
    pub declared_count: usize,
    pub city_count: usize,
    pub edge_count: usize,
    pub complete: bool,
    pub min_weight: Option<u64>,
    pub max_weight: Option<u64>,
    pub avg_weight: f64,
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph:")?;
        writeln!(f, "  Declared cities: {}", self.declared_count)?;
        writeln!(f, "  Registered cities: {}", self.city_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Complete: {}", self.complete)?;
        if let (Some(min), Some(max)) = (self.min_weight, self.max_weight) {
            writeln!(f, "  Min weight: {}", min)?;
            writeln!(f, "  Max weight: {}", max)?;
        }
        writeln!(f, "  Avg weight: {:.2}", self.avg_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_city_graph() -> Graph {
        Graph::build(
            4,
            [
                (0, 1, 10),
                (0, 2, 15),
                (0, 3, 20),
                (1, 2, 35),
                (1, 3, 25),
                (2, 3, 30),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_distance_is_symmetric() {
        let graph = Graph::build(3, [(0, 2, 7)]).unwrap();
        assert_eq!(graph.distance(0, 2).unwrap(), 7);
        assert_eq!(graph.distance(2, 0).unwrap(), 7);
    }

    #[test]
    fn test_duplicate_edge_last_write_wins() {
        let graph = Graph::build(2, [(0, 1, 4), (1, 0, 9)]).unwrap();
        assert_eq!(graph.distance(0, 1).unwrap(), 9);
        assert_eq!(graph.distance(1, 0).unwrap(), 9);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_missing_neighbor() {
        let graph = Graph::build(3, [(0, 1, 4)]).unwrap();
        assert!(matches!(
            graph.distance(0, 2),
            Err(TspError::NeighborNotFound { city: 0, neighbor: 2 })
        ));
        // City 2 was never registered at all
        assert!(matches!(
            graph.distance(2, 0),
            Err(TspError::NeighborNotFound { city: 2, neighbor: 0 })
        ));
    }

    #[test]
    fn test_invalid_index() {
        let result = Graph::build(3, [(0, 1, 1), (1, 5, 2)]);
        assert!(matches!(
            result,
            Err(TspError::InvalidIndex { index: 5, city_count: 3 })
        ));
    }

    #[test]
    fn test_city_count_counts_registered_cities() {
        let graph = Graph::build(5, [(0, 1, 1), (1, 3, 1)]).unwrap();
        assert_eq!(graph.declared_count(), 5);
        assert_eq!(graph.city_count(), 3);
        let ids: Vec<usize> = graph.cities().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 3]);
    }

    #[test]
    fn test_tour_distance_reference_values() {
        let graph = four_city_graph();
        assert_eq!(graph.tour_distance(&[0, 1, 2, 3]).unwrap(), 95);
        assert_eq!(graph.tour_distance(&[0, 2, 1, 3]).unwrap(), 95);
        assert_eq!(graph.tour_distance(&[0, 1, 3, 2]).unwrap(), 80);
        assert_eq!(graph.tour_distance(&[]).unwrap(), 0);
    }

    #[test]
    fn test_route_legs_include_wraparound() {
        let graph = four_city_graph();
        let legs = graph.route_legs(&[0, 1, 2, 3]).unwrap();
        assert_eq!(legs, vec![(0, 1, 10), (1, 2, 35), (2, 3, 30), (3, 0, 20)]);
    }

    #[test]
    fn test_neighbors_sorted() {
        let graph = four_city_graph();
        let city = graph.city(1).unwrap();
        assert_eq!(city.neighbors(), vec![(0, 10), (2, 35), (3, 25)]);
        assert_eq!(city.degree(), 3);
    }

    #[test]
    fn test_completeness() {
        assert!(four_city_graph().is_complete());
        let sparse = Graph::build(3, [(0, 1, 1), (1, 2, 1)]).unwrap();
        assert!(!sparse.is_complete());
    }

    #[test]
    fn test_parse_text() {
        let graph = Graph::parse("3\n0 1 5\n1 2 6\n2   0\t7\n").unwrap();
        assert_eq!(graph.city_count(), 3);
        assert_eq!(graph.tour_distance(&[0, 1, 2]).unwrap(), 18);
    }

    #[test]
    fn test_parse_format_error_reports_line() {
        let result = Graph::parse("3\n0 1 5\n1 2\n");
        assert!(matches!(result, Err(TspError::Format { line: 2, found: 2 })));

        let result = Graph::parse("3\n0 1 5\n\n");
        assert!(matches!(result, Err(TspError::Format { line: 2, found: 0 })));
    }

    #[test]
    fn test_parse_index_errors() {
        let result = Graph::parse("3\n0 5 1\n");
        assert!(matches!(
            result,
            Err(TspError::InvalidIndex { index: 5, city_count: 3 })
        ));

        let result = Graph::parse("3\n-1 2 1\n");
        assert!(matches!(
            result,
            Err(TspError::InvalidIndex { index: -1, city_count: 3 })
        ));
    }

    #[test]
    fn test_parse_number_errors() {
        assert!(matches!(
            Graph::parse("3\n0 x 1\n"),
            Err(TspError::InvalidNumber { line: 1, .. })
        ));
        assert!(matches!(
            Graph::parse("3\n0 1 -4\n"),
            Err(TspError::InvalidNumber { line: 1, .. })
        ));
        assert!(matches!(Graph::parse(""), Err(TspError::MissingHeader)));
        assert!(matches!(
            Graph::parse("three\n"),
            Err(TspError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_weight_outside_int_range_rejected() {
        assert!(matches!(
            Graph::parse("2\n0 1 18446744073709551615\n"),
            Err(TspError::InvalidNumber { line: 1, .. })
        ));
        assert!(matches!(
            Graph::parse("2\n0 1 4294967296\n"),
            Err(TspError::InvalidNumber { line: 1, .. })
        ));
    }

    #[test]
    fn test_largest_weights_sum_without_overflow() {
        let graph = Graph::parse("3\n0 1 4294967295\n1 2 4294967295\n2 0 4294967295\n").unwrap();
        assert_eq!(graph.tour_distance(&[0, 1, 2]).unwrap(), 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_errors_follow_line_order() {
        // The index error on line 1 is reported before the format error on line 2
        let result = Graph::parse("2\n0 4 1\n0 1\n");
        assert!(matches!(result, Err(TspError::InvalidIndex { index: 4, .. })));
    }

    #[test]
    fn test_statistics() {
        let stats = four_city_graph().statistics();
        assert_eq!(stats.edge_count, 6);
        assert_eq!(stats.min_weight, Some(10));
        assert_eq!(stats.max_weight, Some(35));
        assert!((stats.avg_weight - 22.5).abs() < 1e-10);
        assert!(stats.complete);
        assert!(stats.to_string().contains("Edges: 6"));
    }
}
