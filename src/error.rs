//! Error types for graph construction and tour evaluation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a graph or evaluating a tour.
///
/// Every error is fatal to the operation that raised it: nothing is retried
/// and no partial graph or result is returned.
#[derive(Debug, Error)]
pub enum TspError {
    /// The input had no city count line.
    #[error("missing city count on the first line")]
    MissingHeader,

    /// The city count line is not a non-negative integer.
    #[error("invalid city count: {token:?}")]
    InvalidHeader { token: String },

    /// An edge line does not have exactly three fields.
    #[error("invalid input format at line {line}: expected 3 fields, found {found}")]
    Format { line: usize, found: usize },

    /// An edge line field is not an integer, or the weight is negative.
    #[error("invalid number {token:?} at line {line}")]
    InvalidNumber { line: usize, token: String },

    /// An edge references a city outside `[0, city_count)`.
    #[error("invalid city index: {index} (city count is {city_count})")]
    InvalidIndex { index: i64, city_count: usize },

    /// A distance was requested between two cities with no registered edge.
    #[error("neighbor not found: city {city} has no edge to city {neighbor}")]
    NeighborNotFound { city: usize, neighbor: usize },

    /// The round-trip distance of a tour does not fit in a `u64`.
    #[error("distance of a {legs}-leg tour overflows")]
    DistanceOverflow { legs: usize },

    /// An annealing parameter is out of its valid range.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TspError>;
