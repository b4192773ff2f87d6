use core::fmt;

use log::debug;
use petgraph::unionfind::UnionFind;

use crate::direction::{Direction, NO_DIRECTION};
use crate::error::{Result, SearchError};
use crate::node::MAX_COORD;
use crate::point::Point;

/// Marker stored in the open-index table for cells that are not in the heap.
const NOT_OPEN: u32 = u32::MAX;

/// [Grid] holds the walkability map together with the per-cell side tables a search mutates:
/// the closed flag, the slot of the cell's entry in the open heap and the direction it was
/// reached from. All tables are flat and indexed by `y * width + x`.
///
/// In addition, connected components are maintained using a [UnionFind] structure so that
/// searches between disconnected cells can be rejected without flood-filling.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    walkable: Vec<bool>,
    closed: Vec<bool>,
    open_index: Vec<u32>,
    parent: Vec<u8>,
    /// Cells whose search state was touched since the last [clear](Grid::clear).
    touched: Vec<u32>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// Creates a fully walkable grid. Both sides must be in `1..=MAX_COORD + 1`.
    pub fn new(width: usize, height: usize) -> Result<Grid> {
        let max = MAX_COORD as usize + 1;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(SearchError::InvalidDimensions { width, height });
        }
        let n = width * height;
        Ok(Grid {
            width,
            height,
            walkable: vec![true; n],
            closed: vec![false; n],
            open_index: vec![NOT_OPEN; n],
            parent: vec![NO_DIRECTION; n],
            touched: Vec::new(),
            // A fully walkable grid with at least one cell is a single component
            components: Self::single_component(n),
            components_dirty: false,
        })
    }

    /// Creates a grid whose walkability is given by `walkable(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut walkable: F) -> Result<Grid>
    where
        F: FnMut(i32, i32) -> bool,
    {
        let mut grid = Grid::new(width, height)?;
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let ix = grid.ix(x, y);
                grid.walkable[ix] = walkable(x, y);
            }
        }
        grid.generate_components();
        Ok(grid)
    }

    fn single_component(n: usize) -> UnionFind<usize> {
        let mut components = UnionFind::new(n);
        for ix in 1..n {
            components.union(0, ix);
        }
        components
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline(always)]
    fn ix(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.in_bounds(x, y), "({x}, {y}) outside grid");
        y as usize * self.width + x as usize
    }

    fn ix_point(&self, point: &Point) -> usize {
        self.ix(point.x(), point.y())
    }

    /// False for cells outside the grid and for cells marked unwalkable.
    #[inline(always)]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.walkable[self.ix(x, y)]
    }

    /// Whether a single step from `(x, y)` in `dir` is legal: the target must be walkable and a
    /// diagonal step additionally needs both orthogonally adjacent cells to be walkable, so no
    /// corner is cut.
    #[inline(always)]
    pub fn can_step(&self, x: i32, y: i32, dir: Direction) -> bool {
        let (dx, dy) = dir.delta();
        self.is_walkable(x + dx, y + dy)
            && (!dir.diagonal() || (self.is_walkable(x + dx, y) && self.is_walkable(x, y + dy)))
    }

    /// Updates a position on the grid. Joins newly connected components and flags the components
    /// as dirty if components are (potentially) broken apart into multiple.
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(SearchError::CoordinateOutOfRange { x, y });
        }
        let ix = self.ix(x, y);
        if self.walkable[ix] == walkable {
            return Ok(());
        }
        self.walkable[ix] = walkable;
        if walkable {
            for dir in Direction::ALL {
                if self.can_step(x, y, dir) {
                    let (dx, dy) = dir.delta();
                    let n_ix = self.ix(x + dx, y + dy);
                    self.components.union(ix, n_ix);
                }
            }
        } else {
            self.components_dirty = true;
        }
        Ok(())
    }

    /// Sets every cell of the `w` by `h` rectangle with top-left corner `(x, y)`.
    pub fn set_walkable_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        walkable: bool,
    ) -> Result<()> {
        for cy in y..y + h {
            for cx in x..x + w {
                self.set_walkable(cx, cy, walkable)?;
            }
        }
        Ok(())
    }

    pub fn is_closed(&self, x: i32, y: i32) -> bool {
        self.closed[self.ix(x, y)]
    }

    pub fn node_closed(&mut self, x: i32, y: i32) {
        let ix = self.ix(x, y);
        if !self.closed[ix] && self.open_index[ix] == NOT_OPEN {
            self.touched.push(ix as u32);
        }
        self.closed[ix] = true;
    }

    pub fn parent_direction(&self, x: i32, y: i32) -> Option<Direction> {
        Direction::from_code(self.parent[self.ix(x, y)])
    }

    pub fn node_parent_direction_update(&mut self, x: i32, y: i32, dir: Option<Direction>) {
        let ix = self.ix(x, y);
        self.parent[ix] = dir.map_or(NO_DIRECTION, Direction::code);
    }

    /// Slot of the cell's entry in the open heap, if it has one.
    pub fn open_node_idx(&self, x: i32, y: i32) -> Option<usize> {
        match self.open_index[self.ix(x, y)] {
            NOT_OPEN => None,
            slot => Some(slot as usize),
        }
    }

    pub fn open_node_idx_update(&mut self, x: i32, y: i32, slot: Option<usize>) {
        let ix = self.ix(x, y);
        if self.open_index[ix] == NOT_OPEN && !self.closed[ix] {
            self.touched.push(ix as u32);
        }
        self.open_index[ix] = slot.map_or(NOT_OPEN, |s| s as u32);
    }

    /// Resets the closed, open-index and parent tables of every cell touched since the last
    /// call. Idempotent.
    pub fn clear(&mut self) {
        for ix in self.touched.drain(..) {
            let ix = ix as usize;
            self.closed[ix] = false;
            self.open_index[ix] = NOT_OPEN;
            self.parent[ix] = NO_DIRECTION;
        }
    }

    /// True if no cell is marked closed or open.
    pub fn is_clean(&self) -> bool {
        self.closed.iter().all(|c| !c) && self.open_index.iter().all(|&i| i == NOT_OPEN)
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.ix_point(point))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Cells outside the grid are
    /// unreachable.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.in_bounds(start.x(), start.y()) && self.in_bounds(goal.x(), goal.y()) {
            let start_ix = self.ix_point(start);
            let goal_ix = self.ix_point(goal);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up walkable neighbours to the same
    /// components. Only the forward half of the neighbourhood is visited since links are
    /// symmetric.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        let forward = [
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
        ];
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if !self.is_walkable(x, y) {
                    continue;
                }
                let ix = self.ix(x, y);
                for dir in forward {
                    if self.can_step(x, y, dir) {
                        let (dx, dy) = dir.delta();
                        let n_ix = self.ix(x + dx, y + dy);
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height as i32 {
            let row = (0..self.width as i32)
                .map(|x| if self.is_walkable(x, y) { '.' } else { '#' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
