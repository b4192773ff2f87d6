use core::fmt;

use crate::error::{Result, SearchError};

const COORD_BITS: u32 = 12;
const COST_BITS: u32 = 20;

/// Largest x or y a [Node] can carry; grid sides are limited to `MAX_COORD + 1`.
pub const MAX_COORD: u32 = (1 << COORD_BITS) - 1;
/// Largest `g` or `f` a [Node] can carry.
pub const MAX_COST: u32 = (1 << COST_BITS) - 1;

const Y_SHIFT: u32 = 0;
const X_SHIFT: u32 = COORD_BITS;
const G_SHIFT: u32 = 2 * COORD_BITS;
const F_SHIFT: u32 = 2 * COORD_BITS + COST_BITS;

/// An open-set entry packed into a single [u64]:
///
/// ```text
/// [63:44] f   (20 bits)
/// [43:24] g   (20 bits)
/// [23:12] x   (12 bits)
/// [11:0]  y   (12 bits)
/// ```
///
/// `f` sits in the most significant bits so comparing raw keys orders by `f` first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node(u64);

impl Node {
    /// Encodes a node. Coordinates must lie in `0..=MAX_COORD`. A cost above [MAX_COST] means
    /// the path is too long to represent and is reported as [SearchError::PathTooLong] rather
    /// than being truncated.
    pub fn new(x: i32, y: i32, g: u32, f: u32) -> Result<Node> {
        if x < 0 || y < 0 || x as u32 > MAX_COORD || y as u32 > MAX_COORD {
            return Err(SearchError::CoordinateOutOfRange { x, y });
        }
        if f > MAX_COST || g > MAX_COST {
            return Err(SearchError::PathTooLong(f.max(g)));
        }
        debug_assert!(f >= g, "f = {f} below g = {g}");
        Ok(Node(
            (f as u64) << F_SHIFT
                | (g as u64) << G_SHIFT
                | (x as u64) << X_SHIFT
                | (y as u64) << Y_SHIFT,
        ))
    }

    #[inline(always)]
    pub fn x(self) -> i32 {
        (((self.0 >> X_SHIFT) as u32) & MAX_COORD) as i32
    }

    #[inline(always)]
    pub fn y(self) -> i32 {
        (((self.0 >> Y_SHIFT) as u32) & MAX_COORD) as i32
    }

    #[inline(always)]
    pub fn g(self) -> u32 {
        ((self.0 >> G_SHIFT) as u32) & MAX_COST
    }

    #[inline(always)]
    pub fn f(self) -> u32 {
        ((self.0 >> F_SHIFT) as u32) & MAX_COST
    }

    #[inline(always)]
    pub fn key(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Node")
            .field("x", &self.x())
            .field("y", &self.y())
            .field("g", &self.g())
            .field("f", &self.f())
            .finish()
    }
}
