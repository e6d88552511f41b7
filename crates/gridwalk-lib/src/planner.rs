//! Search planning on user-facing grids.
//!
//! This module provides:
//! - [`SearchAlgorithm`] - named priority presets (A*, weighted A*, greedy, Dijkstra)
//! - [`PriorityRule`] - a preset or a free-form formula
//! - [`SearchRequest`] - coordinates plus movement and heuristic configuration
//! - [`plan_search`] - pads the grid, builds the neighbour and heuristic
//!   tables, runs the engine and maps the result back to grid coordinates
//!
//! # Example
//!
//! ```
//! use gridwalk_lib::{plan_search, Cell, Grid, SearchRequest};
//!
//! let grid = Grid::from_rows(&["....", ".@@.", "...."]).unwrap();
//! let request = SearchRequest::a_star(Cell::new(0, 0), Cell::new(2, 3));
//! let plan = plan_search(&grid, &request).unwrap();
//! assert_eq!(plan.path_cost, Some(5));
//! ```

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::formula::{Formula, FormulaMode};
use crate::grid::{Cell, Connectivity, Grid, HeuristicKind};
use crate::search::{reported_cost, search_with_formula};

/// Named priority presets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    /// `G+H`.
    #[default]
    #[serde(rename = "a-star")]
    AStar,
    /// `G+w*H`.
    Weighted(f64),
    /// `H`.
    Greedy,
    /// `G`.
    Dijkstra,
}

impl SearchAlgorithm {
    /// Formula text implementing this preset.
    pub fn formula(self) -> Result<String> {
        let text = match self {
            SearchAlgorithm::AStar => "G+H".to_string(),
            SearchAlgorithm::Weighted(weight) => {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(Error::InvalidWeight { weight });
                }
                format!("G+{weight}*H")
            }
            SearchAlgorithm::Greedy => "H".to_string(),
            SearchAlgorithm::Dijkstra => "G".to_string(),
        };
        Ok(text)
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchAlgorithm::AStar => f.write_str("a-star"),
            SearchAlgorithm::Weighted(weight) => write!(f, "weighted({weight})"),
            SearchAlgorithm::Greedy => f.write_str("greedy"),
            SearchAlgorithm::Dijkstra => f.write_str("dijkstra"),
        }
    }
}

/// How open cells are ordered.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorityRule {
    Algorithm(SearchAlgorithm),
    Formula(String),
}

impl Default for PriorityRule {
    fn default() -> Self {
        PriorityRule::Algorithm(SearchAlgorithm::default())
    }
}

/// High-level search request expressed in grid coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub start: Cell,
    pub goal: Cell,
    pub priority: PriorityRule,
    /// Parsing mode for free-form formulas; presets always parse strictly.
    pub mode: FormulaMode,
    pub connectivity: Connectivity,
    pub heuristic: HeuristicKind,
}

impl SearchRequest {
    /// Plain A* with four-connectivity and the Manhattan heuristic.
    pub fn a_star(start: Cell, goal: Cell) -> Self {
        Self {
            start,
            goal,
            priority: PriorityRule::default(),
            mode: FormulaMode::Strict,
            connectivity: Connectivity::Four,
            heuristic: HeuristicKind::Manhattan,
        }
    }

    pub fn with_algorithm(mut self, algorithm: SearchAlgorithm) -> Self {
        self.priority = PriorityRule::Algorithm(algorithm);
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.priority = PriorityRule::Formula(formula.into());
        self
    }

    pub fn with_mode(mut self, mode: FormulaMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Compile the configured priority into a formula.
    pub fn compile(&self) -> Result<Formula> {
        let formula = match &self.priority {
            PriorityRule::Algorithm(algorithm) => Formula::parse(&algorithm.formula()?)?,
            PriorityRule::Formula(text) => Formula::parse_with_mode(text, self.mode)?,
        };
        Ok(formula)
    }
}

/// Planned search returned by the library.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub algorithm: Option<SearchAlgorithm>,
    pub formula: Formula,
    pub connectivity: Connectivity,
    pub heuristic: HeuristicKind,
    pub start: Cell,
    pub goal: Cell,
    pub path_cost: Option<u64>,
    pub nodes_expanded: usize,
    pub stale_entries: usize,
    /// Cells from start to goal, inclusive; empty when unsolved.
    pub path: Vec<Cell>,
}

impl SearchPlan {
    pub fn solved(&self) -> bool {
        self.path_cost.is_some()
    }

    /// Path cost with [`NO_PATH_COST`](crate::NO_PATH_COST) for failures.
    pub fn reported_cost(&self) -> i64 {
        reported_cost(self.path_cost)
    }
}

/// Compute a search on `grid` according to `request`.
///
/// The grid is padded with an obstacle border before searching, so callers
/// do not need to provide one.
pub fn plan_search(grid: &Grid, request: &SearchRequest) -> Result<SearchPlan> {
    let formula = request.compile()?;

    let padded = grid.padded();
    let start = padded.checked_index("start", shift(grid, "start", request.start)?)?;
    let goal = padded.checked_index("goal", shift(grid, "goal", request.goal)?)?;

    let offsets = request.connectivity.offsets(padded.height());
    let heuristic = request.heuristic.table(&padded, goal)?;

    let outcome = search_with_formula(&padded, &offsets, start, goal, &heuristic, &formula)?;

    let path = outcome
        .path
        .iter()
        .flatten()
        .map(|&index| {
            let cell = padded.cell(index);
            Cell::new(cell.row - 1, cell.col - 1)
        })
        .collect();

    info!(
        formula = formula.source(),
        start = %request.start,
        goal = %request.goal,
        solved = outcome.solved(),
        nodes_expanded = outcome.nodes_expanded,
        "search planned"
    );

    Ok(SearchPlan {
        algorithm: match &request.priority {
            PriorityRule::Algorithm(algorithm) => Some(*algorithm),
            PriorityRule::Formula(_) => None,
        },
        formula,
        connectivity: request.connectivity,
        heuristic: request.heuristic,
        start: request.start,
        goal: request.goal,
        path_cost: outcome.path_cost,
        nodes_expanded: outcome.nodes_expanded,
        stale_entries: outcome.stale_entries,
        path,
    })
}

/// Validate `cell` against the unpadded grid and move it into padded coordinates.
fn shift(grid: &Grid, what: &'static str, cell: Cell) -> Result<Cell> {
    grid.checked_index(what, cell)?;
    Ok(Cell::new(cell.row + 1, cell.col + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_compile_to_expected_formulas() {
        assert_eq!(SearchAlgorithm::AStar.formula().unwrap(), "G+H");
        assert_eq!(SearchAlgorithm::Weighted(2.5).formula().unwrap(), "G+2.5*H");
        assert_eq!(SearchAlgorithm::Greedy.formula().unwrap(), "H");
        assert_eq!(SearchAlgorithm::Dijkstra.formula().unwrap(), "G");
    }

    #[test]
    fn invalid_weights_are_rejected() {
        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            let err = SearchAlgorithm::Weighted(weight)
                .formula()
                .expect_err("invalid weight");
            assert!(matches!(err, Error::InvalidWeight { .. }));
        }
    }

    #[test]
    fn out_of_grid_goal_is_rejected() {
        let grid = Grid::new(3, 3);
        let request = SearchRequest::a_star(Cell::new(0, 0), Cell::new(3, 0));
        let err = plan_search(&grid, &request).expect_err("goal outside");
        assert!(matches!(err, Error::CellOutOfBounds { what: "goal", .. }));
    }

    #[test]
    fn malformed_formula_fails_before_search() {
        let grid = Grid::new(3, 3);
        let request = SearchRequest::a_star(Cell::new(0, 0), Cell::new(2, 2)).with_formula("G+");
        let err = plan_search(&grid, &request).expect_err("parse error");
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn path_is_reported_in_grid_coordinates() {
        let grid = Grid::new(1, 3);
        let request = SearchRequest::a_star(Cell::new(0, 0), Cell::new(0, 2));
        let plan = plan_search(&grid, &request).expect("route exists");
        assert_eq!(
            plan.path,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]
        );
        assert_eq!(plan.path_cost, Some(2));
        assert_eq!(plan.reported_cost(), 2);
        assert_eq!(plan.algorithm, Some(SearchAlgorithm::AStar));
    }

    #[test]
    fn unsolved_plan_reports_sentinel_cost() {
        let grid = Grid::from_rows(&[".@."]).expect("valid rows");
        let request = SearchRequest::a_star(Cell::new(0, 0), Cell::new(0, 2));
        let plan = plan_search(&grid, &request).expect("valid request");
        assert!(!plan.solved());
        assert_eq!(plan.reported_cost(), crate::NO_PATH_COST);
    }
}
