use thiserror::Error;

use crate::formula::ParseError;
use crate::grid::Cell;

/// Convenient result alias for the gridwalk library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The priority formula could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Raised when a start or goal index falls outside the grid.
    #[error("{what} index {index} is outside the grid ({len} cells)")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Raised when a start or goal coordinate falls outside the grid.
    #[error("{what} cell {cell} is outside the {height}x{width} grid")]
    CellOutOfBounds {
        what: &'static str,
        cell: Cell,
        height: usize,
        width: usize,
    },

    /// Raised when a coordinate string is not of the form `row,col`.
    #[error("invalid cell {input:?}; expected `row,col`")]
    InvalidCell { input: String },

    /// Raised when a weighted search is configured with an unusable weight.
    #[error("heuristic weight must be finite and non-negative, got {weight}")]
    InvalidWeight { weight: f64 },

    /// Raised when a per-cell table does not have one entry per grid cell.
    #[error("{table} table has {actual} entries but the grid has {expected} cells")]
    TableSizeMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Raised when applying a neighbour offset escapes the backing array.
    ///
    /// Grids are expected to carry an obstacle border wide enough for every
    /// offset; see [`Grid::padded`](crate::Grid::padded).
    #[error("neighbour offset {offset} from cell {node} leaves the grid ({len} cells)")]
    NeighborOutOfBounds { node: usize, offset: isize, len: usize },

    /// Raised when a text map cannot be decoded.
    #[error("invalid map at line {line}: {message}")]
    InvalidMap { line: usize, message: String },

    /// Raised when a summary cannot be serialised.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds { what, index, len })
        }
    }

    pub(crate) fn check_table(table: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Error::TableSizeMismatch {
                table,
                expected,
                actual,
            })
        }
    }
}
