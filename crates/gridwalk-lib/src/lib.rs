//! gridwalk library entry points.
//!
//! This crate compiles textual priority formulas over `G` (accumulated cost)
//! and `H` (heuristic estimate) and uses them to order a best-first search
//! on occupancy grids. Higher-level consumers (the CLI) should only depend on
//! the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod error;
pub mod formula;
pub mod grid;
pub mod output;
pub mod planner;
pub mod search;

pub use error::{Error, Result};
pub use formula::{Formula, FormulaMode, ParseError};
pub use grid::{load_map, parse_map, Cell, Connectivity, Grid, HeuristicKind};
pub use output::{render_overlay, RenderMode, SearchSummary};
pub use planner::{plan_search, PriorityRule, SearchAlgorithm, SearchPlan, SearchRequest};
pub use search::{search, search_with_formula, SearchOutcome, NO_PATH_COST};
