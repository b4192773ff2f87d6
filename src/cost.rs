use crate::direction::Direction;
use crate::{C, D, E};

/// Move costs and the admissible distance estimate used by the search.
pub struct Cost;

impl Cost {
    /// Uses C as cost for cardinal (straight) moves and D for diagonal moves.
    #[inline(always)]
    pub fn step(dir: Direction) -> u32 {
        // (dir_num % 2) * (D - C) + C is the branch-free form of
        // if dir.diagonal() { D } else { C }
        (dir.num() as u32 % 2) * (D - C) + C
    }

    /// Octile distance between two cells, exact on an empty 8-connected grid and therefore
    /// admissible.
    pub fn estimate(x1: i32, y1: i32, x2: i32, y2: i32) -> u32 {
        let delta_x = (x1 - x2).unsigned_abs();
        let delta_y = (y1 - y2).unsigned_abs();
        // Formula from https://github.com/riscy/a_star_on_grids
        // to efficiently compute the cost of a path taking the maximal amount
        // of diagonal steps before going straight
        (E * delta_x.abs_diff(delta_y) + D * (delta_x + delta_y)) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_costs() {
        assert_eq!(Cost::step(Direction::East), C);
        assert_eq!(Cost::step(Direction::SouthWest), D);
    }

    #[test]
    fn estimate_matches_diagonal_then_straight() {
        assert_eq!(Cost::estimate(0, 0, 0, 0), 0);
        assert_eq!(Cost::estimate(0, 0, 3, 0), 3 * C);
        assert_eq!(Cost::estimate(0, 0, 3, 3), 3 * D);
        assert_eq!(Cost::estimate(4, 2, 0, 0), 2 * D + 2 * C);
        assert_eq!(Cost::estimate(0, 0, 4, 2), Cost::estimate(4, 2, 0, 0));
    }
}
