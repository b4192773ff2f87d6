use std::ops::Index;

use itertools::Itertools;

use crate::cost::Cost;
use crate::grid::Grid;
use crate::point::Point;
use crate::reachability::{is_reachable, Line};

/// An ordered list of waypoints from start to goal, both inclusive. Consecutive waypoints are
/// connected by straight lines; an empty path means no route was found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Point> {
        self.points.get(i).copied()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(crate) fn reverse(&mut self) {
        self.points.reverse();
    }

    fn retain_indices(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.points.retain(|_| flags.next().copied().unwrap_or(true));
    }

    /// Drops every waypoint the previous kept waypoint can see past: a point is removed when the
    /// point after it is reachable in a straight line from the current anchor. Passes repeat
    /// until nothing changes, so smoothing a smoothed path is a no-op.
    pub fn smooth(&mut self, grid: &Grid) {
        loop {
            let n = self.points.len();
            if n < 3 {
                return;
            }
            let mut keep = vec![true; n];
            let mut anchor = self.points[0];
            for i in 1..n - 1 {
                let next = self.points[i + 1];
                if is_reachable(anchor.x(), anchor.y(), next.x(), next.y(), grid) {
                    keep[i] = false;
                } else {
                    anchor = self.points[i];
                }
            }
            self.retain_indices(&keep);
            if self.points.len() == n {
                return;
            }
        }
    }

    /// Turns waypoints into a path on the grid which can be followed step by step, walking the
    /// same lines the search and the smoothing use.
    pub fn expand(&self) -> Vec<Point> {
        let mut cells: Vec<Point> = self.points.first().copied().into_iter().collect();
        for (from, to) in self.points.iter().tuple_windows() {
            cells.reserve(from.move_distance(*to) as usize);
            // Waypoints are valid points, so every cell on the line between them is too
            cells.extend(
                Line::new(from.x(), from.y(), to.x(), to.y())
                    .skip(1)
                    .filter_map(|(x, y)| Point::new(x, y).ok()),
            );
        }
        cells
    }

    /// Total move cost, using C for cardinal and D for diagonal steps.
    pub fn cost(&self) -> u32 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| Cost::estimate(a.x(), a.y(), b.x(), b.y()))
            .sum()
    }
}

impl Index<usize> for Path {
    type Output = Point;

    fn index(&self, i: usize) -> &Point {
        &self.points[i]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<Point> for Path {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Path {
        Path {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{C, D};

    fn path(points: &[(i32, i32)]) -> Path {
        points
            .iter()
            .map(|&(x, y)| Point::new(x, y).unwrap())
            .collect()
    }

    #[test]
    fn expand_walks_every_cell() {
        let p = path(&[(0, 0), (2, 2), (2, 4)]);
        let cells = p
            .expand()
            .into_iter()
            .map(|p| (p.x(), p.y()))
            .collect::<Vec<_>>();
        assert_eq!(cells, vec![(0, 0), (1, 1), (2, 2), (2, 3), (2, 4)]);
    }

    #[test]
    fn expand_of_empty_path_is_empty() {
        assert!(Path::new().expand().is_empty());
    }

    #[test]
    fn cost_sums_segments() {
        let p = path(&[(0, 0), (2, 2), (2, 4)]);
        assert_eq!(p.cost(), 2 * D + 2 * C);
        assert_eq!(Path::new().cost(), 0);
    }

    #[test]
    fn smoothing_keeps_only_corners_it_cannot_see_past() {
        // ....
        // .##.
        // ....
        let mut grid = Grid::new(4, 3).unwrap();
        grid.set_walkable_rect(1, 1, 2, 1, false).unwrap();
        let mut p = path(&[(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2)]);
        p.smooth(&grid);
        assert_eq!(p, path(&[(0, 0), (3, 0), (3, 2)]));
        let before = p.clone();
        p.smooth(&grid);
        assert_eq!(p, before);

        let open = Grid::new(4, 3).unwrap();
        let mut p = path(&[(0, 0), (3, 0), (3, 2)]);
        p.smooth(&open);
        assert_eq!(p, path(&[(0, 0), (3, 2)]));
    }

    #[test]
    fn retain_indices_drops_flagged_points() {
        let mut p = path(&[(0, 0), (1, 0), (2, 0)]);
        p.retain_indices(&[true, false, true]);
        assert_eq!(p, path(&[(0, 0), (2, 0)]));
        assert_eq!(p[1], Point::new(2, 0).unwrap());
    }
}
