//! Common test utilities and fixture helpers.
//!
//! Provides fixture map loading and a plain breadth-first reference search
//! used to check path costs independently of the engine.

use std::collections::VecDeque;
use std::path::PathBuf;

use gridwalk_lib::{load_map, Cell, Connectivity, Grid, HeuristicKind};

/// Path to the fixture maps used by tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Load a fixture map by file name.
pub fn fixture_grid(name: &str) -> Grid {
    load_map(&fixtures_dir().join(name)).expect("fixture map loads")
}

/// Raw engine inputs for a padded fixture grid.
#[allow(dead_code)]
pub struct Problem {
    pub grid: Grid,
    pub offsets: Vec<isize>,
    pub start: usize,
    pub goal: usize,
    pub heuristic: Vec<u64>,
}

/// Pad `grid` and build offsets and heuristic for a start/goal pair given
/// in unpadded coordinates.
#[allow(dead_code)]
pub fn problem(
    grid: &Grid,
    start: Cell,
    goal: Cell,
    connectivity: Connectivity,
    heuristic: HeuristicKind,
) -> Problem {
    let padded = grid.padded();
    let start = padded.index(Cell::new(start.row + 1, start.col + 1));
    let goal = padded.index(Cell::new(goal.row + 1, goal.col + 1));
    let offsets = connectivity.offsets(padded.height());
    let heuristic = heuristic.table(&padded, goal).expect("goal inside grid");
    Problem {
        grid: padded,
        offsets,
        start,
        goal,
        heuristic,
    }
}

/// Breadth-first distances from `start` on a padded grid.
#[allow(dead_code)]
pub fn bfs_distances(grid: &Grid, offsets: &[isize], start: usize) -> Vec<Option<u64>> {
    let mut distances = vec![None; grid.len()];
    let mut queue = VecDeque::new();
    distances[start] = Some(0);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let distance = distances[current].expect("queued cells have a distance");
        for &offset in offsets {
            let next = current
                .checked_add_signed(offset)
                .expect("padded grid keeps offsets in bounds");
            if grid.is_blocked(next) || distances[next].is_some() {
                continue;
            }
            distances[next] = Some(distance + 1);
            queue.push_back(next);
        }
    }

    distances
}
