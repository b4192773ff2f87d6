use core::fmt;

use crate::error::{Result, SearchError};

/// A grid coordinate packed into a single [u64] key: `x` in the high 32 bits, `y` in the low 32
/// bits. Both coordinates are non-negative, so equality and hashing of the key coincide with
/// equality of the pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point(u64);

impl Point {
    /// Packs `(x, y)`, rejecting negative coordinates.
    pub fn new(x: i32, y: i32) -> Result<Point> {
        if x < 0 || y < 0 {
            return Err(SearchError::CoordinateOutOfRange { x, y });
        }
        Ok(Point((x as u64) << 32 | y as u64))
    }

    /// Reinterprets a raw key produced by [Point::key].
    pub fn from_key(key: u64) -> Point {
        Point(key & 0x7FFF_FFFF_7FFF_FFFF)
    }

    #[inline(always)]
    pub fn key(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn x(self) -> i32 {
        (self.0 >> 32) as i32
    }

    #[inline(always)]
    pub fn y(self) -> i32 {
        (self.0 & 0xFFFF_FFFF) as i32
    }

    /// Number of king moves between two points.
    pub fn move_distance(self, other: Point) -> i32 {
        (self.x() - other.x()).abs().max((self.y() - other.y()).abs())
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_both_coordinates() {
        let p = Point::new(7, 4_000_000).unwrap();
        assert_eq!(p.x(), 7);
        assert_eq!(p.y(), 4_000_000);
        assert_eq!(Point::from_key(p.key()), p);
    }

    #[test]
    fn rejects_negative_coordinates() {
        assert_eq!(
            Point::new(-1, 3),
            Err(SearchError::CoordinateOutOfRange { x: -1, y: 3 })
        );
        assert!(Point::new(3, -1).is_err());
    }

    #[test]
    fn extreme_coordinates_do_not_collide() {
        let a = Point::new(i32::MAX, 0).unwrap();
        let b = Point::new(0, i32::MAX).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.x(), i32::MAX);
        assert_eq!(b.y(), i32::MAX);
    }

    #[test]
    fn move_distance_is_chebyshev() {
        let a = Point::new(1, 1).unwrap();
        let b = Point::new(4, 2).unwrap();
        assert_eq!(a.move_distance(b), 3);
    }
}
