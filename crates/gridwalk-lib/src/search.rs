use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::grid::Grid;

/// Path cost reported to hosts when no path exists.
pub const NO_PATH_COST: i64 = -1;

/// Result of a single best-first search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Number of unit steps on the found path, `None` when the goal was not reached.
    pub path_cost: Option<u64>,
    /// Number of cells closed before the search stopped.
    pub nodes_expanded: usize,
    /// Queue entries discarded because a cheaper path had since been recorded.
    pub stale_entries: usize,
    /// Linear indices from start to goal, inclusive, when solved.
    pub path: Option<Vec<usize>>,
}

impl SearchOutcome {
    pub fn solved(&self) -> bool {
        self.path_cost.is_some()
    }

    /// Path cost with the host convention of [`NO_PATH_COST`] for failures.
    pub fn reported_cost(&self) -> i64 {
        reported_cost(self.path_cost)
    }
}

/// Map an optional path cost onto the signed host convention: the step
/// count, or [`NO_PATH_COST`] when the goal was not reached.
pub fn reported_cost(path_cost: Option<u64>) -> i64 {
    path_cost.map_or(NO_PATH_COST, |cost| i64::try_from(cost).unwrap_or(i64::MAX))
}

/// Compile `formula` and run [`search_with_formula`].
///
/// A malformed formula is rejected before any cell is expanded.
pub fn search(
    grid: &Grid,
    offsets: &[isize],
    start: usize,
    goal: usize,
    heuristic: &[u64],
    formula: &str,
) -> Result<SearchOutcome> {
    let formula = Formula::parse(formula)?;
    search_with_formula(grid, offsets, start, goal, heuristic, &formula)
}

/// Run best-first search from `start` to `goal`, ordering the open list by
/// `formula` evaluated at each cell's accumulated cost and heuristic value.
///
/// Every step costs 1. Among entries with equal priority the one with the
/// larger accumulated cost is expanded first, then the one pushed earlier.
/// Entries whose cost no longer matches the best known cost for their cell
/// are skipped when popped rather than removed from the queue.
///
/// The start cell is expanded even when it is an obstacle. An obstacle goal
/// is never reached.
pub fn search_with_formula(
    grid: &Grid,
    offsets: &[isize],
    start: usize,
    goal: usize,
    heuristic: &[u64],
    formula: &Formula,
) -> Result<SearchOutcome> {
    let len = grid.len();
    Error::check_index("start", start, len)?;
    Error::check_index("goal", goal, len)?;
    Error::check_table("heuristic", len, heuristic.len())?;

    debug!(
        start,
        goal,
        formula = formula.source(),
        cells = len,
        "starting best-first search"
    );

    // `None` marks cells that are neither open nor closed; the start's cost
    // of zero is an ordinary value.
    let mut g_score: Vec<Option<u64>> = vec![None; len];
    let mut closed = vec![false; len];
    let mut parents: Vec<Option<usize>> = vec![None; len];
    let mut queue = BinaryHeap::new();
    let mut sequence = 0u64;
    let mut nodes_expanded = 0usize;
    let mut stale_entries = 0usize;
    let mut reached = false;

    g_score[start] = Some(0);
    queue.push(OpenEntry::new(formula.evaluate(0, heuristic[start]), 0, start, sequence));

    while let Some(entry) = queue.pop() {
        if g_score[entry.node] != Some(entry.g) {
            trace!(node = entry.node, g = entry.g, "skipping stale queue entry");
            stale_entries += 1;
            continue;
        }

        if entry.node == goal {
            reached = true;
            break;
        }

        closed[entry.node] = true;
        nodes_expanded += 1;

        for &offset in offsets {
            let next = neighbour(entry.node, offset, len)?;
            if grid.is_blocked(next) || closed[next] {
                continue;
            }

            let tentative_g = entry.g + 1;
            if g_score[next].map_or(true, |known| tentative_g < known) {
                g_score[next] = Some(tentative_g);
                parents[next] = Some(entry.node);
                sequence += 1;
                let priority = formula.evaluate(tentative_g, heuristic[next]);
                queue.push(OpenEntry::new(priority, tentative_g, next, sequence));
            }
        }
    }

    let outcome = if reached {
        SearchOutcome {
            path_cost: g_score[goal],
            nodes_expanded,
            stale_entries,
            path: Some(reconstruct_path(&parents, start, goal)),
        }
    } else {
        SearchOutcome {
            path_cost: None,
            nodes_expanded,
            stale_entries,
            path: None,
        }
    };

    debug!(
        solved = outcome.solved(),
        cost = outcome.reported_cost(),
        nodes_expanded,
        stale_entries,
        pushed = sequence + 1,
        "best-first search finished"
    );

    Ok(outcome)
}

fn neighbour(node: usize, offset: isize, len: usize) -> Result<usize> {
    node.checked_add_signed(offset)
        .filter(|&next| next < len)
        .ok_or(Error::NeighborOutOfBounds { node, offset, len })
}

fn reconstruct_path(parents: &[Option<usize>], start: usize, goal: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug)]
struct Priority(f64);

impl Priority {
    fn new(value: f64) -> Self {
        // Every NaN becomes the positive quiet NaN, which `total_cmp` places
        // after `f64::MAX`; a negative-sign NaN would otherwise sort first.
        if value.is_nan() {
            return Self(f64::NAN);
        }
        // Adding +0.0 turns -0.0 into +0.0 so the two tie.
        Self(value + 0.0)
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct OpenEntry {
    priority: Priority,
    g: u64,
    node: usize,
    sequence: u64,
}

impl OpenEntry {
    fn new(priority: f64, g: u64, node: usize, sequence: u64) -> Self {
        Self {
            priority: Priority::new(priority),
            g,
            node,
            sequence,
        }
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry: lowest priority, then the
        // largest g, then the earliest sequence number.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
