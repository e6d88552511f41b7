mod common;

use common::{bfs_distances, fixture_grid, problem, Problem};
use gridwalk_lib::{
    search, search_with_formula, Cell, Connectivity, Error, Formula, Grid, HeuristicKind,
    NO_PATH_COST,
};

fn run(problem: &Problem, formula: &str) -> gridwalk_lib::SearchOutcome {
    search(
        &problem.grid,
        &problem.offsets,
        problem.start,
        problem.goal,
        &problem.heuristic,
        formula,
    )
    .expect("valid search inputs")
}

fn assert_path_is_walkable(problem: &Problem, path: &[usize]) {
    assert_eq!(path.first(), Some(&problem.start));
    assert_eq!(path.last(), Some(&problem.goal));
    for pair in path.windows(2) {
        let delta = pair[1] as isize - pair[0] as isize;
        assert!(
            problem.offsets.contains(&delta),
            "step {} -> {} is not a legal move",
            pair[0],
            pair[1]
        );
        assert!(!problem.grid.is_blocked(pair[1]));
    }
}

#[test]
fn plain_a_star_finds_shortest_path() {
    let grid = fixture_grid("rooms.map");
    let problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(5, 6),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );
    let shortest = bfs_distances(&problem.grid, &problem.offsets, problem.start)[problem.goal]
        .expect("goal reachable");

    let outcome = run(&problem, "G+H");

    assert!(outcome.solved());
    assert_eq!(outcome.path_cost, Some(shortest));
    assert!(outcome.nodes_expanded <= problem.grid.open_cells());
    let path = outcome.path.expect("solved search has a path");
    assert_eq!(path.len() as u64, shortest + 1);
    assert_path_is_walkable(&problem, &path);
}

#[test]
fn eight_connected_a_star_matches_reference() {
    let grid = fixture_grid("rooms.map");
    let problem = problem(
        &grid,
        Cell::new(8, 0),
        Cell::new(5, 6),
        Connectivity::Eight,
        HeuristicKind::Chebyshev,
    );
    let shortest = bfs_distances(&problem.grid, &problem.offsets, problem.start)[problem.goal];

    let outcome = run(&problem, "G+H");

    assert_eq!(outcome.path_cost, shortest);
}

#[test]
fn dijkstra_formula_is_optimal_and_expands_more() {
    let grid = fixture_grid("rooms.map");
    let problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(5, 6),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );

    let a_star = run(&problem, "G+H");
    let dijkstra = run(&problem, "G");

    assert_eq!(dijkstra.path_cost, a_star.path_cost);
    assert!(dijkstra.nodes_expanded >= a_star.nodes_expanded);
}

#[test]
fn greedy_search_terminates_with_a_path() {
    let grid = fixture_grid("rooms.map");
    let problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(5, 6),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );
    let shortest = bfs_distances(&problem.grid, &problem.offsets, problem.start)[problem.goal]
        .expect("goal reachable");

    let outcome = run(&problem, "H");

    assert!(outcome.solved());
    let cost = outcome.path_cost.expect("solved");
    assert!(cost >= shortest);
    assert_path_is_walkable(&problem, &outcome.path.expect("solved search has a path"));
}

#[test]
fn conditional_formula_still_solves() {
    let grid = fixture_grid("rooms.map");
    let problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(5, 6),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );

    let outcome = run(&problem, "if(G<5,H,G+2*H)");

    assert!(outcome.solved());
}

#[test]
fn enclosed_goal_exhausts_reachable_component() {
    let grid = fixture_grid("enclosed.map");
    let problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(2, 2),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );
    let reachable = bfs_distances(&problem.grid, &problem.offsets, problem.start)
        .iter()
        .filter(|distance| distance.is_some())
        .count();

    let outcome = run(&problem, "G+H");

    assert!(!outcome.solved());
    assert_eq!(outcome.reported_cost(), NO_PATH_COST);
    assert_eq!(outcome.nodes_expanded, reachable);
    assert_eq!(outcome.nodes_expanded, 26);
    assert!(outcome.path.is_none());
}

#[test]
fn repeated_runs_are_identical() {
    let grid = fixture_grid("rooms.map");
    let problem = problem(
        &grid,
        Cell::new(7, 13),
        Cell::new(2, 2),
        Connectivity::Eight,
        HeuristicKind::Chebyshev,
    );

    let first = run(&problem, "G+1.5*H");
    let second = run(&problem, "G+1.5*H");

    assert_eq!(first, second);
}

#[test]
fn earlier_entry_wins_exact_ties() {
    let grid = Grid::new(2, 2);
    let mut problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(1, 1),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );
    let south = problem.grid.index(Cell::new(2, 1));
    let east = problem.grid.index(Cell::new(1, 2));

    // South is enqueued before east: both score f=2 with g=1.
    let outcome = run(&problem, "G+H");
    assert_eq!(
        outcome.path,
        Some(vec![problem.start, south, problem.goal])
    );
    assert_eq!(outcome.nodes_expanded, 2);

    problem.offsets.reverse();
    let outcome = run(&problem, "G+H");
    assert_eq!(outcome.path, Some(vec![problem.start, east, problem.goal]));
}

#[test]
fn rediscovered_cell_expands_only_its_cheapest_entry() {
    let grid = Grid::new(3, 3);
    let goal = Cell::new(1, 2);
    let mut problem = problem(
        &grid,
        Cell::new(0, 0),
        goal,
        Connectivity::Four,
        HeuristicKind::Zero,
    );
    // Greedy ordering follows the bottom-left detour first, so the goal is
    // discovered at g=5 and then rediscovered at g=3 through the top row.
    let estimates = [
        ((1, 0), 1),
        ((2, 0), 1),
        ((2, 1), 1),
        ((2, 2), 1),
        ((0, 1), 5),
        ((0, 2), 6),
        ((1, 2), 7),
        ((1, 1), 8),
    ];
    for ((row, col), h) in estimates {
        let index = problem.grid.index(Cell::new(row + 1, col + 1));
        problem.heuristic[index] = h;
    }
    let shortest = bfs_distances(&problem.grid, &problem.offsets, problem.start)[problem.goal];

    let outcome = run(&problem, "H");

    assert_eq!(outcome.stale_entries, 1);
    assert_eq!(outcome.path_cost, Some(3));
    assert_eq!(outcome.path_cost, shortest);
    assert_eq!(outcome.nodes_expanded, 7);
    let path = outcome.path.expect("solved search has a path");
    let top_right = problem.grid.index(Cell::new(1, 3));
    assert_eq!(path.len(), 4);
    assert_eq!(path[path.len() - 2], top_right);
    assert_path_is_walkable(&problem, &path);
}

#[test]
fn malformed_formula_fails_before_expanding() {
    let grid = fixture_grid("corridor.map");
    let problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(2, 0),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );

    let err = search(
        &problem.grid,
        &problem.offsets,
        problem.start,
        problem.goal,
        &problem.heuristic,
        "G+",
    )
    .expect_err("malformed formula");

    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn lenient_formula_degrades_instead_of_failing() {
    let grid = fixture_grid("corridor.map");
    let problem = problem(
        &grid,
        Cell::new(0, 0),
        Cell::new(2, 0),
        Connectivity::Four,
        HeuristicKind::Manhattan,
    );
    let formula = Formula::parse_lenient("G+H+");
    assert!(formula.is_degenerate());

    let outcome = search_with_formula(
        &problem.grid,
        &problem.offsets,
        problem.start,
        problem.goal,
        &problem.heuristic,
        &formula,
    )
    .expect("valid search inputs");

    assert_eq!(outcome.path_cost, Some(18));
}

#[test]
fn start_outside_grid_is_rejected() {
    let grid = Grid::new(3, 3);
    let heuristic = vec![0; grid.len()];
    let err = search(&grid, &[1], 9, 0, &heuristic, "G").expect_err("start outside");
    assert!(matches!(
        err,
        Error::IndexOutOfBounds {
            what: "start",
            index: 9,
            len: 9
        }
    ));
}
