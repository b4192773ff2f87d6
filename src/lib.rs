//! # grid_astar
//!
//! A* shortest paths on a 2D walkability grid. The search keeps its per-cell state in flat
//! tables on the [Grid] and its open set in an indexed 4-ary heap of packed [Node]s, so a
//! cell's priority can be decreased in place and no per-node allocation happens. Paths are
//! reconstructed from a direction code per cell rather than from parent pointers.
//!
//! Moves go to any of the eight neighbours; a diagonal move is only taken if both cells it
//! passes by are walkable. The heuristic is the octile distance, which is admissible for these
//! move costs.
//!
//! Besides the search, [reachability] snaps a blocked or out-of-range target to the closest point
//! that can be reached in a straight line, and [Grid] maintains
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) to avoid
//! flood-filling behaviour if no path exists.
//!
//! ```
//! use grid_astar::{AStar, Grid};
//!
//! let mut grid = Grid::new(5, 5).unwrap();
//! grid.set_walkable(1, 0, false).unwrap();
//! grid.set_walkable(1, 1, false).unwrap();
//! let path = AStar::new().search(0, 0, 2, 2, &mut grid, false).unwrap();
//! assert_eq!(path.len(), 3);
//! ```
pub mod astar;
pub mod cost;
pub mod direction;
pub mod error;
pub mod grid;
pub mod node;
pub mod nodes;
pub mod path;
mod per_thread;
pub mod point;
pub mod reachability;

pub use astar::{AStar, SearchConfig, DEFAULT_MAX_OPEN_NODES};
pub use cost::Cost;
pub use direction::Direction;
pub use error::{Result, SearchError};
pub use grid::Grid;
pub use node::Node;
pub use nodes::Nodes;
pub use path::Path;
pub use per_thread::ThreadLocalAStar;
pub use point::Point;

/// Cost of a cardinal (straight) move.
pub const C: u32 = 10;
/// Cost of a diagonal move, roughly `C * sqrt(2)`.
pub const D: u32 = 14;
/// Helper constant for the octile distance formula.
pub const E: u32 = 2 * C - D;

/// Computes a path with the calling thread's driver. See [AStar::search].
pub fn search(
    start_x: i32,
    start_y: i32,
    goal_x: i32,
    goal_y: i32,
    grid: &mut Grid,
    smoothing: bool,
) -> Result<Path> {
    ThreadLocalAStar::with(|astar| astar.search(start_x, start_y, goal_x, goal_y, grid, smoothing))
}
