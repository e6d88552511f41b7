//! Command-line argument types and their mapping onto library requests.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use gridwalk_lib::{
    Cell, Connectivity, FormulaMode, HeuristicKind, RenderMode, SearchAlgorithm, SearchRequest,
};

/// Output format shared by every subcommand.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    pub fn render_mode(self) -> RenderMode {
        match self {
            OutputFormat::Text => RenderMode::PlainText,
            OutputFormat::Json => RenderMode::Json,
        }
    }
}

/// Named priority presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    /// G+H
    #[default]
    AStar,
    /// G+w*H, see --weight
    Weighted,
    /// H
    Greedy,
    /// G
    Dijkstra,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ConnectivityArg {
    /// Orthogonal moves only
    #[default]
    Four,
    /// Orthogonal and diagonal moves
    Eight,
}

impl From<ConnectivityArg> for Connectivity {
    fn from(value: ConnectivityArg) -> Self {
        match value {
            ConnectivityArg::Four => Connectivity::Four,
            ConnectivityArg::Eight => Connectivity::Eight,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum HeuristicArg {
    #[default]
    Manhattan,
    Chebyshev,
    Zero,
}

impl From<HeuristicArg> for HeuristicKind {
    fn from(value: HeuristicArg) -> Self {
        match value {
            HeuristicArg::Manhattan => HeuristicKind::Manhattan,
            HeuristicArg::Chebyshev => HeuristicKind::Chebyshev,
            HeuristicArg::Zero => HeuristicKind::Zero,
        }
    }
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Octile map file to search.
    #[arg(long)]
    pub map: PathBuf,

    /// Start cell as `row,col`.
    #[arg(long)]
    pub start: Cell,

    /// Goal cell as `row,col`.
    #[arg(long)]
    pub goal: Cell,

    /// Custom priority formula over G and H, e.g. `G+2*H`.
    #[arg(long, conflicts_with = "algorithm")]
    pub formula: Option<String>,

    /// Priority preset used when no formula is given.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::AStar)]
    pub algorithm: AlgorithmArg,

    /// Heuristic weight for `--algorithm weighted`.
    #[arg(long, default_value_t = 2.0)]
    pub weight: f64,

    #[arg(long, value_enum, default_value_t = ConnectivityArg::Four)]
    pub connectivity: ConnectivityArg,

    #[arg(long, value_enum, default_value_t = HeuristicArg::Manhattan)]
    pub heuristic: HeuristicArg,

    /// Degrade malformed formulas instead of rejecting them.
    #[arg(long)]
    pub lenient: bool,

    /// Include the path and a map overlay in the output.
    #[arg(long)]
    pub show_path: bool,
}

impl SearchArgs {
    /// Convert CLI args to a library [`SearchRequest`].
    pub fn to_request(&self) -> SearchRequest {
        let request = SearchRequest::a_star(self.start, self.goal)
            .with_connectivity(self.connectivity.into())
            .with_heuristic(self.heuristic.into())
            .with_mode(formula_mode(self.lenient));

        match &self.formula {
            Some(formula) => request.with_formula(formula.clone()),
            None => request.with_algorithm(match self.algorithm {
                AlgorithmArg::AStar => SearchAlgorithm::AStar,
                AlgorithmArg::Weighted => SearchAlgorithm::Weighted(self.weight),
                AlgorithmArg::Greedy => SearchAlgorithm::Greedy,
                AlgorithmArg::Dijkstra => SearchAlgorithm::Dijkstra,
            }),
        }
    }
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Formula to compile.
    pub formula: String,

    /// Degrade malformed formulas instead of rejecting them.
    #[arg(long)]
    pub lenient: bool,

    /// Value bound to G when evaluating.
    #[arg(long, default_value_t = 0)]
    pub g: u64,

    /// Value bound to H when evaluating.
    #[arg(long, default_value_t = 0)]
    pub h: u64,
}

impl CheckArgs {
    pub fn mode(&self) -> FormulaMode {
        formula_mode(self.lenient)
    }
}

fn formula_mode(lenient: bool) -> FormulaMode {
    if lenient {
        FormulaMode::Lenient
    } else {
        FormulaMode::Strict
    }
}
