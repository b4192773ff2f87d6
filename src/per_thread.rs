use std::cell::RefCell;

use crate::astar::AStar;
use crate::error::Result;
use crate::grid::Grid;
use crate::path::Path;

thread_local! {
    static CURRENT: RefCell<AStar> = RefCell::new(AStar::new());
}

/// Access to the calling thread's own [AStar], created lazily on first use. Threads never share
/// a driver, so no locking is involved.
///
/// Code that can own its driver explicitly, for example a worker holding an [AStar] for its
/// whole lifetime, should prefer doing so.
pub struct ThreadLocalAStar;

impl ThreadLocalAStar {
    /// The `current()` accessor: runs `f` with this thread's driver. The driver is lent to a
    /// closure rather than returned so it cannot escape the thread. A nested call from inside `f`
    /// gets a fresh driver instead of the busy one.
    pub fn with<R, F>(f: F) -> R
    where
        F: FnOnce(&mut AStar) -> R,
    {
        CURRENT.with(|cell| match cell.try_borrow_mut() {
            Ok(mut astar) => f(&mut *astar),
            Err(_) => f(&mut AStar::new()),
        })
    }

    /// [AStar::search_into] on this thread's driver.
    pub fn search_into(
        start_x: i32,
        start_y: i32,
        goal_x: i32,
        goal_y: i32,
        grid: &mut Grid,
        path: &mut Path,
        smoothing: bool,
    ) -> Result<()> {
        Self::with(|astar| {
            astar.search_into(start_x, start_y, goal_x, goal_y, grid, path, smoothing)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::SearchConfig;
    use std::thread;

    #[test]
    fn each_thread_gets_its_own_driver() {
        let handles = (0..4)
            .map(|i| {
                thread::spawn(move || {
                    let mut grid = Grid::new(16, 16).unwrap();
                    grid.set_walkable_rect(8, 0, 1, 15, false).unwrap();
                    let mut path = Path::new();
                    for _ in 0..10 {
                        ThreadLocalAStar::search_into(0, i, 15, i, &mut grid, &mut path, true)
                            .unwrap();
                        assert_eq!(path.first().map(|p| p.y()), Some(i));
                        assert_eq!(path.last().map(|p| p.x()), Some(15));
                        assert!(grid.is_clean());
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn nested_use_falls_back_to_a_fresh_driver() {
        let limits = ThreadLocalAStar::with(|outer| {
            let inner = ThreadLocalAStar::with(|inner| inner.config());
            (outer.config(), inner)
        });
        assert_eq!(limits.0, SearchConfig::default());
        assert_eq!(limits.1, SearchConfig::default());
    }
}
