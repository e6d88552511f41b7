use std::collections::HashSet;
use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;
use crate::grid::{Cell, Connectivity, Grid, HeuristicKind};
use crate::planner::{SearchAlgorithm, SearchPlan};

/// Presentation style for turning a [`SearchSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    Json,
}

/// Structured representation of a finished search that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<SearchAlgorithm>,
    pub formula: String,
    /// Fully parenthesised rendering of the compiled formula.
    pub compiled: String,
    pub connectivity: Connectivity,
    pub heuristic: HeuristicKind,
    pub start: Cell,
    pub goal: Cell,
    pub solved: bool,
    /// Number of unit steps, or `-1` when no path was found.
    pub path_cost: i64,
    pub nodes_expanded: usize,
    pub stale_entries: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Cell>,
}

impl SearchSummary {
    pub fn from_plan(plan: &SearchPlan) -> Self {
        Self {
            algorithm: plan.algorithm,
            formula: plan.formula.source().to_string(),
            compiled: plan.formula.to_string(),
            connectivity: plan.connectivity,
            heuristic: plan.heuristic,
            start: plan.start,
            goal: plan.goal,
            solved: plan.solved(),
            path_cost: plan.reported_cost(),
            nodes_expanded: plan.nodes_expanded,
            stale_entries: plan.stale_entries,
            path: plan.path.clone(),
        }
    }

    /// Drop the path so only the scalar results are reported.
    pub fn without_path(mut self) -> Self {
        self.path.clear();
        self
    }

    pub fn render(&self, mode: RenderMode) -> Result<String> {
        match mode {
            RenderMode::PlainText => Ok(self.render_plain()),
            RenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let label = self
            .algorithm
            .map(|algorithm| algorithm.to_string())
            .unwrap_or_else(|| "custom".to_string());
        let _ = writeln!(
            buffer,
            "Search from {} to {} (priority: {} [{}]; {} connectivity, {} heuristic):",
            self.start, self.goal, self.formula, label, self.connectivity, self.heuristic
        );
        if self.solved {
            let _ = writeln!(buffer, "  solved: yes");
            let _ = writeln!(buffer, "  path cost: {}", self.path_cost);
        } else {
            let _ = writeln!(buffer, "  solved: no");
            let _ = writeln!(buffer, "  path cost: {} (no path)", self.path_cost);
        }
        let _ = writeln!(buffer, "  nodes expanded: {}", self.nodes_expanded);
        if !self.path.is_empty() {
            let steps = self
                .path
                .iter()
                .map(Cell::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            let _ = writeln!(buffer, "  path: {steps}");
        }
        buffer
    }
}

/// Draw `grid` as text with the path marked.
///
/// Obstacles are `@`, open cells `.`, path cells `*`, and the path's
/// endpoints `S` and `G`.
pub fn render_overlay(grid: &Grid, path: &[Cell]) -> String {
    let on_path: HashSet<Cell> = path.iter().copied().collect();
    let mut buffer = String::with_capacity(grid.len() + grid.height());
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cell = Cell::new(row, col);
            let symbol = if path.first() == Some(&cell) {
                'S'
            } else if path.last() == Some(&cell) {
                'G'
            } else if on_path.contains(&cell) {
                '*'
            } else if grid.is_blocked(grid.index(cell)) {
                '@'
            } else {
                '.'
            };
            buffer.push(symbol);
        }
        buffer.push('\n');
    }
    buffer
}
