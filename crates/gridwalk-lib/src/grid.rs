//! Occupancy grids, movement models and heuristic tables.
//!
//! Cells are addressed by a column-major linear index `row + col * height`,
//! which is the layout the search engine consumes. Neighbour offsets are
//! plain deltas on that index, so a grid must carry an obstacle border for
//! offsets never to wrap between columns or leave the backing array; see
//! [`Grid::padded`].

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Row/column coordinate of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl FromStr for Cell {
    type Err = Error;

    /// Parse `row,col`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCell {
            input: s.to_string(),
        };
        let (row, col) = s.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        Ok(Self { row, col })
    }
}

/// Immutable-by-convention occupancy grid; `true` marks an obstacle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    blocked: Vec<bool>,
}

impl Grid {
    /// Create an obstacle-free grid.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            blocked: vec![false; height * width],
        }
    }

    /// Wrap a column-major occupancy array.
    pub fn from_cells(height: usize, width: usize, blocked: Vec<bool>) -> Result<Self> {
        Error::check_table("occupancy", height * width, blocked.len())?;
        Ok(Self {
            height,
            width,
            blocked,
        })
    }

    /// Build a grid from text rows. `.`, `G` and `S` are passable, every
    /// other character is an obstacle.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let mut grid = Self::new(height, width);

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let columns = line.chars().count();
            if columns != width {
                return Err(Error::InvalidMap {
                    line: row + 1,
                    message: format!("row has {columns} columns, expected {width}"),
                });
            }
            for (col, cell) in line.chars().enumerate() {
                grid.set_blocked(Cell::new(row, col), !is_passable(cell));
            }
        }

        Ok(grid)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells in the backing array.
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Column-major occupancy array.
    pub fn cells(&self) -> &[bool] {
        &self.blocked
    }

    /// Linear index of a cell.
    pub fn index(&self, cell: Cell) -> usize {
        cell.row + cell.col * self.height
    }

    /// Linear index of a cell, checking it lies inside the grid.
    pub fn checked_index(&self, what: &'static str, cell: Cell) -> Result<usize> {
        if cell.row >= self.height || cell.col >= self.width {
            return Err(Error::CellOutOfBounds {
                what,
                cell,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.index(cell))
    }

    /// Coordinate of a linear index.
    pub fn cell(&self, index: usize) -> Cell {
        Cell {
            row: index % self.height,
            col: index / self.height,
        }
    }

    pub fn is_blocked(&self, index: usize) -> bool {
        self.blocked[index]
    }

    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        let index = self.index(cell);
        self.blocked[index] = blocked;
    }

    /// Count of passable cells.
    pub fn open_cells(&self) -> usize {
        self.blocked.iter().filter(|blocked| !**blocked).count()
    }

    /// Copy of this grid surrounded by a one-cell obstacle border.
    ///
    /// Cell `(r, c)` of `self` becomes `(r + 1, c + 1)` in the result, and
    /// every offset produced by [`Connectivity::offsets`] stays in bounds from
    /// any passable cell.
    pub fn padded(&self) -> Grid {
        let mut padded = Grid {
            height: self.height + 2,
            width: self.width + 2,
            blocked: vec![true; (self.height + 2) * (self.width + 2)],
        };
        for col in 0..self.width {
            for row in 0..self.height {
                let blocked = self.blocked[self.index(Cell::new(row, col))];
                padded.set_blocked(Cell::new(row + 1, col + 1), blocked);
            }
        }
        padded
    }
}

fn is_passable(cell: char) -> bool {
    matches!(cell, '.' | 'G' | 'S')
}

/// Movement model used to derive neighbour offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// North, south, west, east.
    #[default]
    Four,
    /// Four plus the diagonals, still at unit cost.
    Eight,
}

impl Connectivity {
    /// Linear-index deltas for a column-major grid of the given height.
    ///
    /// Order is north, south, west, east, then north-west, south-west,
    /// north-east, south-east. Expansion order, and therefore tie-breaking,
    /// follows this order.
    pub fn offsets(self, height: usize) -> Vec<isize> {
        let h = height as isize;
        let mut offsets = vec![-1, 1, -h, h];
        if self == Connectivity::Eight {
            offsets.extend([-h - 1, -h + 1, h - 1, h + 1]);
        }
        offsets
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Four => f.write_str("four"),
            Connectivity::Eight => f.write_str("eight"),
        }
    }
}

/// Distance estimates used to fill a heuristic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Always zero.
    Zero,
    /// Row plus column distance; admissible for four-connectivity.
    #[default]
    Manhattan,
    /// Larger of row and column distance; admissible for eight-connectivity.
    Chebyshev,
}

impl HeuristicKind {
    /// Estimate from every cell of `grid` to `goal`, in linear-index order.
    pub fn table(self, grid: &Grid, goal: usize) -> Result<Vec<u64>> {
        Error::check_index("goal", goal, grid.len())?;
        let target = grid.cell(goal);
        let table = (0..grid.len())
            .map(|index| {
                let cell = grid.cell(index);
                let rows = cell.row.abs_diff(target.row) as u64;
                let cols = cell.col.abs_diff(target.col) as u64;
                match self {
                    HeuristicKind::Zero => 0,
                    HeuristicKind::Manhattan => rows + cols,
                    HeuristicKind::Chebyshev => rows.max(cols),
                }
            })
            .collect();
        Ok(table)
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeuristicKind::Zero => f.write_str("zero"),
            HeuristicKind::Manhattan => f.write_str("manhattan"),
            HeuristicKind::Chebyshev => f.write_str("chebyshev"),
        }
    }
}

/// Load a grid from a map file; see [`parse_map`] for the format.
pub fn load_map(path: &Path) -> Result<Grid> {
    debug!(path = %path.display(), "loading map");
    let text = fs::read_to_string(path)?;
    parse_map(&text)
}

/// Decode a text map.
///
/// The format is the octile benchmark layout:
///
/// ```text
/// type octile
/// height 3
/// width 4
/// map
/// ....
/// .@@.
/// ....
/// ```
///
/// `.`, `G` and `S` are passable; anything else is an obstacle.
pub fn parse_map(text: &str) -> Result<Grid> {
    let mut lines = text.lines().enumerate().map(|(number, line)| (number + 1, line));

    let (line, kind) = header_field(lines.next(), "type")?;
    if kind != "octile" {
        return Err(Error::InvalidMap {
            line,
            message: format!("unsupported map type {kind}"),
        });
    }
    let height = dimension(header_field(lines.next(), "height")?)?;
    let width = dimension(header_field(lines.next(), "width")?)?;

    match lines.next().map(|(line, text)| (line, text.trim())) {
        Some((_, "map")) => {}
        Some((line, other)) => {
            return Err(Error::InvalidMap {
                line,
                message: format!("expected map token, got {other:?}"),
            })
        }
        None => return Err(unexpected_eof()),
    }

    let rows: Vec<&str> = lines
        .map(|(_, row)| row.trim_end_matches('\r'))
        .filter(|row| !row.is_empty())
        .collect();
    if rows.len() != height {
        return Err(Error::InvalidMap {
            line: 5 + rows.len().min(height),
            message: format!("map has {} rows, header declares {height}", rows.len()),
        });
    }

    let grid = Grid::from_rows(&rows).map_err(|err| match err {
        Error::InvalidMap { line, message } => Error::InvalidMap {
            line: line + 4,
            message,
        },
        other => other,
    })?;
    if grid.width() != width {
        return Err(Error::InvalidMap {
            line: 5,
            message: format!("map has {} columns, header declares {width}", grid.width()),
        });
    }

    Ok(grid)
}

fn header_field<'a>(line: Option<(usize, &'a str)>, name: &str) -> Result<(usize, &'a str)> {
    let Some((number, text)) = line else {
        return Err(unexpected_eof());
    };
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(key), Some(value), None) if key == name => Ok((number, value)),
        _ => Err(Error::InvalidMap {
            line: number,
            message: format!("expected `{name} <value>`"),
        }),
    }
}

fn dimension((line, value): (usize, &str)) -> Result<usize> {
    value.parse().map_err(|_| Error::InvalidMap {
        line,
        message: format!("invalid dimension {value:?}"),
    })
}

fn unexpected_eof() -> Error {
    Error::InvalidMap {
        line: 0,
        message: "unexpected end of file".to_string(),
    }
}
