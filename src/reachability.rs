//! Straight-line reachability on a [Grid], independent of the A* driver.
//!
//! The walks here use the same step rule as the search: every cell on the line must be walkable
//! and a diagonal step needs both orthogonal neighbours to be walkable.
use itertools::Itertools;
use log::debug;

use crate::direction::Direction;
use crate::error::{Result, SearchError};
use crate::grid::Grid;
use crate::point::Point;

/// Restricts which cell-to-cell steps a reachability walk may take, on top of walkability.
pub trait Fence {
    fn permits(&self, from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> bool;
}

impl<F> Fence for F
where
    F: Fn(i32, i32, i32, i32) -> bool,
{
    fn permits(&self, from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> bool {
        self(from_x, from_y, to_x, to_y)
    }
}

/// A [Fence] that permits every step.
#[derive(Clone, Copy, Debug, Default)]
pub struct Open;

impl Fence for Open {
    fn permits(&self, _: i32, _: i32, _: i32, _: i32) -> bool {
        true
    }
}

/// Bresenham line from `(x0, y0)` to `(x1, y1)`, both inclusive. Every step advances the dominant
/// axis by one and the other axis by at most one.
///
/// The walk state is kept in [i64] so any pair of [i32] endpoints works, however far apart.
#[derive(Clone, Debug)]
pub struct Line {
    x: i64,
    y: i64,
    x1: i64,
    y1: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl Line {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Line {
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        Line {
            x: x0,
            y: y0,
            x1,
            y1,
            dx,
            dy,
            sx: (x1 - x0).signum(),
            sy: (y1 - y0).signum(),
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.done {
            return None;
        }
        // Always between the two endpoints, so it fits back into i32
        let current = (self.x as i32, self.y as i32);
        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
        } else {
            let e2 = 2 * self.err;
            if e2 >= self.dy {
                self.err += self.dy;
                self.x += self.sx;
            }
            if e2 <= self.dx {
                self.err += self.dx;
                self.y += self.sy;
            }
        }
        Some(current)
    }
}

/// Whether `(x2, y2)` can be reached from `(x1, y1)` by walking the straight line between them.
pub fn is_reachable(x1: i32, y1: i32, x2: i32, y2: i32, grid: &Grid) -> bool {
    grid.is_walkable(x1, y1)
        && Line::new(x1, y1, x2, y2)
            .tuple_windows()
            .all(|((ax, ay), (bx, by))| {
                Direction::from_delta(bx - ax, by - ay).map_or(true, |dir| grid.can_step(ax, ay, dir))
            })
}

/// Walks from the start cell towards the target and returns the last point that could be
/// reached, which is the target itself if the whole line is clear.
pub fn closest_walkable_point_to_target(
    start_x: i32,
    start_y: i32,
    target_x: i32,
    target_y: i32,
    grid: &Grid,
) -> Result<Point> {
    closest_walkable_point_to_target_with(start_x, start_y, target_x, target_y, 1, grid, &Open)
}

/// Like [closest_walkable_point_to_target], with coordinates given in a space where one grid
/// cell spans `scale` units, and with every cell change checked against `fence`.
///
/// The walk advances one unit at a time along the line. Whenever it enters a new cell, the step
/// between the two cells must be legal on the grid and permitted by the fence, otherwise the
/// walk stops. The start point is returned unchanged if its own cell is not walkable.
pub fn closest_walkable_point_to_target_with<F>(
    start_x: i32,
    start_y: i32,
    target_x: i32,
    target_y: i32,
    scale: i32,
    grid: &Grid,
    fence: &F,
) -> Result<Point>
where
    F: Fence + ?Sized,
{
    if scale <= 0 {
        return Err(SearchError::InvalidScale(scale));
    }
    let start = Point::new(start_x, start_y)?;
    let cell = |v: i32| v.div_euclid(scale);
    let (mut cx, mut cy) = (cell(start_x), cell(start_y));
    if !grid.is_walkable(cx, cy) {
        debug!("Start {} is not walkable", start);
        return Ok(start);
    }
    let mut last = start;
    for (x, y) in Line::new(start_x, start_y, target_x, target_y).skip(1) {
        let (nx, ny) = (cell(x), cell(y));
        if (nx, ny) != (cx, cy) {
            let legal = Direction::from_delta(nx - cx, ny - cy)
                .map_or(false, |dir| grid.can_step(cx, cy, dir));
            if !legal || !fence.permits(cx, cy, nx, ny) {
                break;
            }
            cx = nx;
            cy = ny;
        }
        // Inside a walkable cell, so both coordinates are non-negative
        last = Point::new(x, y)?;
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(p: Point) -> (i32, i32) {
        (p.x(), p.y())
    }

    #[test]
    fn line_covers_both_ends() {
        let cells = Line::new(0, 0, 4, 2).collect::<Vec<_>>();
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(4, 2)));
        assert_eq!(cells.len(), 5);
        assert_eq!(Line::new(3, 3, 3, 3).collect::<Vec<_>>(), vec![(3, 3)]);
        let back = Line::new(4, 2, 0, 0).collect::<Vec<_>>();
        assert_eq!(back.len(), 5);
    }

    #[test]
    fn straight_line_reachability() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(is_reachable(0, 0, 4, 4, &grid));
        assert!(is_reachable(0, 0, 4, 1, &grid));
        grid.set_walkable(2, 2, false).unwrap();
        assert!(!is_reachable(0, 0, 4, 4, &grid));
        assert!(is_reachable(0, 4, 4, 4, &grid));
        assert!(!is_reachable(2, 2, 2, 2, &grid));
        assert!(!is_reachable(0, 0, 5, 0, &grid));
    }

    #[test]
    fn reachability_does_not_cut_corners() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_walkable(0, 1, false).unwrap();
        assert!(!is_reachable(0, 0, 1, 1, &grid));
    }

    #[test]
    fn open_grid_returns_target() {
        let grid = Grid::new(6, 6).unwrap();
        let p = closest_walkable_point_to_target(0, 0, 5, 3, &grid).unwrap();
        assert_eq!(xy(p), (5, 3));
        let p = closest_walkable_point_to_target_with(1, 2, 55, 31, 10, &grid, &Open).unwrap();
        assert_eq!(xy(p), (55, 31));
    }

    #[test]
    fn unwalkable_start_is_returned_unchanged() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_walkable(1, 1, false).unwrap();
        let p = closest_walkable_point_to_target(1, 1, 3, 3, &grid).unwrap();
        assert_eq!(xy(p), (1, 1));
        let p = closest_walkable_point_to_target(9, 9, 0, 0, &grid).unwrap();
        assert_eq!(xy(p), (9, 9));
    }

    #[test]
    fn stops_before_wall_and_edge() {
        let mut grid = Grid::new(5, 1).unwrap();
        let p = closest_walkable_point_to_target(0, 0, 12, 0, &grid).unwrap();
        assert_eq!(xy(p), (4, 0));
        grid.set_walkable(3, 0, false).unwrap();
        let p = closest_walkable_point_to_target(0, 0, 4, 0, &grid).unwrap();
        assert_eq!(xy(p), (2, 0));
    }

    #[test]
    fn scaled_walk_stops_at_last_point_of_last_cell() {
        let mut grid = Grid::new(5, 1).unwrap();
        grid.set_walkable(3, 0, false).unwrap();
        let p = closest_walkable_point_to_target_with(5, 5, 45, 5, 10, &grid, &Open).unwrap();
        assert_eq!(xy(p), (29, 5));
    }

    #[test]
    fn diagonal_first_step_past_corner_is_rejected() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_walkable(1, 0, false).unwrap();
        let p = closest_walkable_point_to_target(0, 0, 2, 2, &grid).unwrap();
        assert_eq!(xy(p), (0, 0));
    }

    #[test]
    fn fence_limits_the_walk() {
        let grid = Grid::new(6, 1).unwrap();
        let below_three = |_: i32, _: i32, to_x: i32, _: i32| to_x < 3;
        let p = closest_walkable_point_to_target_with(0, 0, 5, 0, 1, &grid, &below_three).unwrap();
        assert_eq!(xy(p), (2, 0));
        let closed = |_: i32, _: i32, _: i32, _: i32| false;
        let p = closest_walkable_point_to_target_with(0, 0, 5, 0, 1, &grid, &closed).unwrap();
        assert_eq!(xy(p), (0, 0));
    }

    #[test]
    fn far_away_targets_stop_at_the_grid_edge() {
        let grid = Grid::new(5, 5).unwrap();
        for (tx, ty) in [
            (2_000_000_000, 2),
            (-2_000_000_000, 2),
            (2, i32::MIN),
            (i32::MAX, i32::MAX),
            (i32::MIN, i32::MIN),
        ] {
            assert!(!is_reachable(2, 2, tx, ty, &grid));
            let p = closest_walkable_point_to_target(2, 2, tx, ty, &grid).unwrap();
            assert!(grid.in_bounds(p.x(), p.y()), "{p} for target ({tx}, {ty})");
        }
        let p = closest_walkable_point_to_target(0, 0, 1_500_000_000, 0, &grid).unwrap();
        assert_eq!(xy(p), (4, 0));
        let p = closest_walkable_point_to_target(4, 2, -2_000_000_000, 2, &grid).unwrap();
        assert_eq!(xy(p), (0, 2));
    }

    #[test]
    fn line_between_extreme_endpoints_starts_right() {
        let mut line = Line::new(i32::MAX, i32::MIN, i32::MIN, i32::MAX);
        assert_eq!(line.next(), Some((i32::MAX, i32::MIN)));
        assert_eq!(line.next(), Some((i32::MAX - 1, i32::MIN + 1)));
    }

    #[test]
    fn non_positive_scale_is_a_usage_error() {
        let grid = Grid::new(2, 2).unwrap();
        assert_eq!(
            closest_walkable_point_to_target_with(0, 0, 1, 1, 0, &grid, &Open),
            Err(SearchError::InvalidScale(0))
        );
        assert!(closest_walkable_point_to_target_with(0, 0, 1, 1, -2, &grid, &Open).is_err());
    }
}
