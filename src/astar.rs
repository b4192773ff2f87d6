use log::{debug, trace, warn};

use crate::cost::Cost;
use crate::direction::Direction;
use crate::error::{Result, SearchError};
use crate::grid::Grid;
use crate::nodes::Nodes;
use crate::path::Path;
use crate::point::Point;

/// Open-set size at which a search is abandoned unless configured otherwise.
pub const DEFAULT_MAX_OPEN_NODES: usize = 1 << 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Searches whose open set would grow past this fail with [SearchError::TooManyOpenNodes].
    pub max_open_nodes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_open_nodes: DEFAULT_MAX_OPEN_NODES,
        }
    }
}

/// A* driver. Owns the open set and reuses its storage across queries, so one instance should be
/// kept per thread (see [ThreadLocalAStar](crate::ThreadLocalAStar)).
#[derive(Clone, Debug)]
pub struct AStar {
    nodes: Nodes,
}

impl Default for AStar {
    fn default() -> Self {
        AStar::new()
    }
}

/// Holds everything a running search mutates and resets it when dropped, which covers normal
/// returns, early `?` returns and unwinding alike.
struct SearchGuard<'a> {
    nodes: &'a mut Nodes,
    grid: &'a mut Grid,
    path: &'a mut Path,
    succeeded: bool,
}

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        self.nodes.clear(self.grid);
        if !self.succeeded {
            self.path.clear();
        }
    }
}

impl SearchGuard<'_> {
    /// Runs the open/close loop. Returns whether the goal was closed.
    fn run<A>(&mut self, start: Point, goal: Point, should_abort: &mut A) -> Result<bool>
    where
        A: FnMut() -> bool,
    {
        let (gx, gy) = (goal.x(), goal.y());
        let h = Cost::estimate(start.x(), start.y(), gx, gy);
        self.nodes.open(self.grid, start.x(), start.y(), 0, h, None)?;
        while let Some(node) = self.nodes.close(self.grid) {
            if should_abort() {
                return Err(SearchError::Aborted);
            }
            let (x, y) = (node.x(), node.y());
            if x == gx && y == gy {
                return Ok(true);
            }
            trace!("Expanding ({x}, {y}) with g = {}, f = {}", node.g(), node.f());
            for dir in Direction::ALL {
                if !self.grid.can_step(x, y, dir) {
                    continue;
                }
                let (dx, dy) = dir.delta();
                let (nx, ny) = (x + dx, y + dy);
                if self.grid.is_closed(nx, ny) {
                    continue;
                }
                let g = node.g() + Cost::step(dir);
                let h = Cost::estimate(nx, ny, gx, gy);
                self.nodes.open(self.grid, nx, ny, g, h, Some(dir))?;
            }
        }
        Ok(false)
    }

    /// Follows parent directions back from the goal, recording the goal, every cell where the
    /// direction changes and the start.
    fn reconstruct(&mut self, goal: Point) -> Result<()> {
        let (mut x, mut y) = (goal.x(), goal.y());
        self.path.push(goal);
        let mut last_dir: Option<Direction> = None;
        while let Some(dir) = self.grid.parent_direction(x, y) {
            if last_dir.is_some_and(|d| d != dir) {
                self.path.push(Point::new(x, y)?);
            }
            last_dir = Some(dir);
            (x, y) = dir.predecessor(x, y);
        }
        self.path.push(Point::new(x, y)?);
        self.path.reverse();
        Ok(())
    }
}

impl AStar {
    pub fn new() -> AStar {
        AStar::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> AStar {
        AStar {
            nodes: Nodes::new(config.max_open_nodes),
        }
    }

    pub fn config(&self) -> SearchConfig {
        SearchConfig {
            max_open_nodes: self.nodes.max_open(),
        }
    }

    /// Computes a path from start to goal. The result is empty if either endpoint is not
    /// walkable, if they are equal, or if no route exists.
    pub fn search(
        &mut self,
        start_x: i32,
        start_y: i32,
        goal_x: i32,
        goal_y: i32,
        grid: &mut Grid,
        smoothing: bool,
    ) -> Result<Path> {
        let mut path = Path::new();
        self.search_into(start_x, start_y, goal_x, goal_y, grid, &mut path, smoothing)?;
        Ok(path)
    }

    /// Like [search](Self::search), but fills a caller supplied [Path], which is cleared first.
    #[allow(clippy::too_many_arguments)]
    pub fn search_into(
        &mut self,
        start_x: i32,
        start_y: i32,
        goal_x: i32,
        goal_y: i32,
        grid: &mut Grid,
        path: &mut Path,
        smoothing: bool,
    ) -> Result<()> {
        self.search_with_abort(
            start_x,
            start_y,
            goal_x,
            goal_y,
            grid,
            path,
            smoothing,
            || false,
        )
    }

    /// Like [search_into](Self::search_into), polling `should_abort` once per closed node. A
    /// `true` answer ends the search with [SearchError::Aborted].
    ///
    /// Whatever way the search ends, including a panic raised by `should_abort`, the grid and the
    /// open set are reset before control returns to the caller. On failure the path is left
    /// empty.
    #[allow(clippy::too_many_arguments)]
    pub fn search_with_abort<A>(
        &mut self,
        start_x: i32,
        start_y: i32,
        goal_x: i32,
        goal_y: i32,
        grid: &mut Grid,
        path: &mut Path,
        smoothing: bool,
        mut should_abort: A,
    ) -> Result<()>
    where
        A: FnMut() -> bool,
    {
        path.clear();
        if !grid.is_walkable(start_x, start_y) {
            debug!("Start ({start_x}, {start_y}) is not walkable");
            return Ok(());
        }
        if !grid.is_walkable(goal_x, goal_y) {
            debug!("Goal ({goal_x}, {goal_y}) is not walkable");
            return Ok(());
        }
        if (start_x, start_y) == (goal_x, goal_y) {
            return Ok(());
        }
        // Walkable cells are inside the grid, so both points encode
        let start = Point::new(start_x, start_y)?;
        let goal = Point::new(goal_x, goal_y)?;
        if !grid.components_dirty && grid.unreachable(&start, &goal) {
            debug!("{} is not reachable from {}", goal, start);
            return Ok(());
        }

        {
            let mut guard = SearchGuard {
                nodes: &mut self.nodes,
                grid: &mut *grid,
                path: &mut *path,
                succeeded: false,
            };
            let found = match guard.run(start, goal, &mut should_abort) {
                Ok(found) => found,
                Err(e) => {
                    warn!("Search from {} to {} abandoned: {}", start, goal, e);
                    return Err(e);
                }
            };
            if found {
                guard.reconstruct(goal)?;
                // Smoothing only reads walkability, so the search tables can go first
                guard.nodes.clear(guard.grid);
                if smoothing {
                    guard.path.smooth(guard.grid);
                }
                debug!("Found path from {} to {} with {} waypoints", start, goal, guard.path.len());
            } else if guard.grid.components_dirty {
                debug!("Open set exhausted, {} is not reachable from {}", goal, start);
            } else {
                warn!("Reachable goal could not be pathed to, is reachable graph correct?");
            }
            guard.succeeded = true;
        }
        debug_assert!(grid.is_clean());
        Ok(())
    }
}
