use log::trace;

use crate::direction::Direction;
use crate::error::{Result, SearchError};
use crate::grid::Grid;
use crate::node::Node;

/// log2 of the heap fan-out.
const SHIFT: usize = 2;
const FAN_OUT: usize = 1 << SHIFT;

/// The open set: a 4-ary min-heap of packed [Node]s ordered by `f`.
///
/// Every time an entry is placed in a slot, the slot is written back into the [Grid]'s
/// open-index table. This lets [open](Nodes::open) find an existing entry for a cell in O(1) and
/// decrease its key in place, so each cell has at most one entry in the heap.
///
/// The grid is passed to every mutating call instead of being stored, which keeps the exclusive
/// borrow limited to the search that owns both.
#[derive(Clone, Debug)]
pub struct Nodes {
    heap: Vec<Node>,
    max_open: usize,
}

/// Ties on `f` are broken towards the larger `g`, which favours nodes closer to the goal.
#[inline(always)]
fn before(a: Node, b: Node) -> bool {
    a.f() < b.f() || (a.f() == b.f() && a.g() > b.g())
}

impl Nodes {
    pub fn new(max_open: usize) -> Nodes {
        Nodes {
            heap: Vec::new(),
            max_open,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn max_open(&self) -> usize {
        self.max_open
    }

    /// The entry [close](Nodes::close) would return next.
    pub fn peek(&self) -> Option<Node> {
        self.heap.first().copied()
    }

    /// Offers cell `(x, y)` with cost-so-far `g` and estimate `h`, reached by moving in `parent`.
    ///
    /// Closed cells are ignored. A cell already in the heap is only updated, together with its
    /// parent direction, if the new `f` is strictly smaller. Cells outside the grid are rejected.
    pub fn open(
        &mut self,
        grid: &mut Grid,
        x: i32,
        y: i32,
        g: u32,
        h: u32,
        parent: Option<Direction>,
    ) -> Result<()> {
        if !grid.in_bounds(x, y) {
            return Err(SearchError::CoordinateOutOfRange { x, y });
        }
        if grid.is_closed(x, y) {
            return Ok(());
        }
        let f = g.saturating_add(h);
        match grid.open_node_idx(x, y) {
            Some(slot) => {
                if f < self.heap[slot].f() {
                    trace!("Decreasing ({x}, {y}) to f = {f}");
                    self.heap[slot] = Node::new(x, y, g, f)?;
                    grid.node_parent_direction_update(x, y, parent);
                    self.sift_up(grid, slot);
                }
            }
            None => {
                if self.heap.len() >= self.max_open {
                    return Err(SearchError::TooManyOpenNodes(self.max_open));
                }
                let node = Node::new(x, y, g, f)?;
                grid.node_parent_direction_update(x, y, parent);
                self.heap.push(node);
                self.sift_up(grid, self.heap.len() - 1);
            }
        }
        Ok(())
    }

    /// Pops the entry with the smallest `f` and marks its cell closed. Returns [None] once the
    /// open set is exhausted.
    pub fn close(&mut self, grid: &mut Grid) -> Option<Node> {
        let last = self.heap.pop()?;
        let root = if self.heap.is_empty() {
            last
        } else {
            let root = self.heap[0];
            self.heap[0] = last;
            self.sift_down(grid, 0);
            root
        };
        debug_assert!(self.peek().map_or(true, |next| !before(next, root)));
        grid.node_closed(root.x(), root.y());
        grid.open_node_idx_update(root.x(), root.y(), None);
        Some(root)
    }

    /// Empties the heap and resets the grid's search tables. Capacity is kept for the next search.
    pub fn clear(&mut self, grid: &mut Grid) {
        self.heap.clear();
        grid.clear();
    }

    #[inline(always)]
    fn place(&mut self, grid: &mut Grid, slot: usize, node: Node) {
        self.heap[slot] = node;
        grid.open_node_idx_update(node.x(), node.y(), Some(slot));
    }

    fn sift_up(&mut self, grid: &mut Grid, mut slot: usize) {
        let node = self.heap[slot];
        while slot > 0 {
            let parent = (slot - 1) >> SHIFT;
            let parent_node = self.heap[parent];
            if !before(node, parent_node) {
                break;
            }
            self.place(grid, slot, parent_node);
            slot = parent;
        }
        self.place(grid, slot, node);
    }

    fn sift_down(&mut self, grid: &mut Grid, mut slot: usize) {
        let node = self.heap[slot];
        let len = self.heap.len();
        loop {
            let first = (slot << SHIFT) + 1;
            if first >= len {
                break;
            }
            let best = (first..len.min(first + FAN_OUT))
                .reduce(|best, c| if before(self.heap[c], self.heap[best]) { c } else { best })
                .unwrap_or(first);
            let best_node = self.heap[best];
            if !before(best_node, node) {
                break;
            }
            self.place(grid, slot, best_node);
            slot = best;
        }
        self.place(grid, slot, node);
    }
}
