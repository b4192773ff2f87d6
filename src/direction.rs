/// One of the eight moves on a grid. Numbering runs clockwise from north, so diagonal
/// directions are exactly the odd ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

/// Parent code stored for cells that were not reached from a neighbour.
pub const NO_DIRECTION: u8 = 0;

const DELTAS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    #[inline(always)]
    pub fn num(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn delta(self) -> (i32, i32) {
        DELTAS[self.num()]
    }

    #[inline(always)]
    pub fn diagonal(self) -> bool {
        self.num() % 2 == 1
    }

    /// The direction pointing from a cell to a neighbour at offset `(dx, dy)`, where both
    /// components are the signs of a step.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        DELTAS
            .iter()
            .position(|&d| d == (dx.signum(), dy.signum()))
            .map(|ix| Direction::ALL[ix])
    }

    /// Compact per-cell code: [NO_DIRECTION] or `num + 1`.
    #[inline(always)]
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            1..=8 => Some(Direction::ALL[code as usize - 1]),
            _ => None,
        }
    }

    /// The cell a move in this direction came from when it ended at `(x, y)`.
    #[inline(always)]
    pub fn predecessor(self, x: i32, y: i32) -> (i32, i32) {
        let (dx, dy) = self.delta();
        (x - dx, y - dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_none_is_distinct() {
        for dir in Direction::ALL {
            assert_ne!(dir.code(), NO_DIRECTION);
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
        assert_eq!(Direction::from_code(NO_DIRECTION), None);
        assert_eq!(Direction::from_code(9), None);
    }

    #[test]
    fn predecessor_undoes_the_move() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(dir.predecessor(5 + dx, 5 + dy), (5, 5));
            assert_eq!(Direction::from_delta(dx * 3, dy * 3), Some(dir));
        }
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    #[test]
    fn odd_directions_are_diagonal() {
        let diagonal = Direction::ALL.iter().filter(|d| d.diagonal()).count();
        assert_eq!(diagonal, 4);
        assert!(Direction::NorthEast.diagonal());
        assert!(!Direction::West.diagonal());
    }
}
