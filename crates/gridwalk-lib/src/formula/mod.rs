//! Priority formulas over the search quantities `G` and `H`.
//!
//! A [`Formula`] is compiled once from text and then evaluated for every
//! node the search engine scores:
//!
//! ```
//! use gridwalk_lib::Formula;
//!
//! let weighted = Formula::parse("G+2*H").unwrap();
//! assert_eq!(weighted.evaluate(3, 4), 11.0);
//! ```

mod ast;
mod parser;

pub use ast::{BinaryOp, Expr, Variable};
pub use parser::{FormulaMode, ParseError, MAX_NESTING, MAX_OPERATORS};

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use parser::Parser;

/// A compiled priority formula together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    root: Expr,
}

impl Formula {
    /// Compile `source`, rejecting any malformed input.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Self::parse_with_mode(source, FormulaMode::Strict)
    }

    /// Compile `source`, replacing malformed subtrees with
    /// [`Expr::Degenerate`] instead of failing.
    pub fn parse_lenient(source: &str) -> Self {
        match Self::parse_with_mode(source, FormulaMode::Lenient) {
            Ok(formula) => formula,
            Err(_) => Self {
                source: source.to_string(),
                root: Expr::Degenerate,
            },
        }
    }

    /// Compile `source` using the given [`FormulaMode`].
    pub fn parse_with_mode(source: &str, mode: FormulaMode) -> Result<Self, ParseError> {
        let (root, degenerate) = Parser::new(source, mode).parse()?;
        if degenerate > 0 {
            warn!(
                formula = source,
                degenerate, "formula contains malformed subtrees; affected nodes score f64::MAX"
            );
        }
        debug!(formula = source, compiled = %root, "compiled priority formula");
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// Score a node with accumulated cost `g` and heuristic `h`.
    #[inline]
    pub fn evaluate(&self, g: u64, h: u64) -> f64 {
        self.root.evaluate(g, h)
    }

    /// The text this formula was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Whether lenient parsing had to substitute any subtree.
    pub fn is_degenerate(&self) -> bool {
        self.root.contains_degenerate()
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
