//! Error types for grid_astar

use thiserror::Error;

/// Errors raised by grid construction, the search driver and the reachability walk.
///
/// An unreachable goal is not an error: the driver reports it as an empty [Path](crate::Path).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("grid dimensions {width}x{height} are invalid (sides must be in 1..={max})", max = crate::node::MAX_COORD + 1)]
    InvalidDimensions { width: usize, height: usize },

    #[error("coordinate ({x}, {y}) cannot be encoded")]
    CoordinateOutOfRange { x: i32, y: i32 },

    #[error("scale must be strictly positive, got {0}")]
    InvalidScale(i32),

    #[error("too many open nodes (limit {0})")]
    TooManyOpenNodes(usize),

    #[error("path cost {0} exceeds the encodable maximum")]
    PathTooLong(u32),

    #[error("search aborted by caller")]
    Aborted,
}

pub type Result<T> = std::result::Result<T, SearchError>;
