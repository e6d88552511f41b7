//! Operator-precedence (Pratt) parser for priority formulas.
//!
//! Grammar, by binding power (higher binds tighter):
//! - `*` (30)
//! - `+`, `-` (20)
//! - `<` (10)
//!
//! Operands are unsigned decimal literals (`2`, `0.75`), the variables `G`
//! and `H`, parenthesised sub-expressions, and `if(condition,then,else)`.
//! Whitespace is not part of the grammar.
//!
//! Nesting deeper than [`MAX_NESTING`] or more than [`MAX_OPERATORS`]
//! operators is malformed input like any other syntax error.

use thiserror::Error;

use super::ast::{BinaryOp, Expr, Variable};

/// Raised when a formula string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("formula parse error at position {position}: {message}")]
pub struct ParseError {
    /// Byte offset into the formula where the problem was detected.
    pub position: usize,
    /// Human-readable description of the problem.
    pub message: String,
}

/// How the parser reacts to malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormulaMode {
    /// Reject malformed formulas with a [`ParseError`].
    #[default]
    Strict,
    /// Replace malformed subtrees with [`Expr::Degenerate`] and keep going.
    ///
    /// A bare operator in operand position parses only its right-hand
    /// operand, and trailing input after a complete expression is ignored.
    Lenient,
}

/// Deepest nesting of sub-expressions the parser descends into.
pub const MAX_NESTING: usize = 256;

/// Most binary and conditional nodes a formula may contain. Bounds the depth
/// of the tree, and with it the recursion of evaluation and teardown.
pub const MAX_OPERATORS: usize = 1024;

/// Single-use parser; the cursor lives here so concurrent parses never share it.
pub(crate) struct Parser<'a> {
    input: &'a str,
    pos: usize,
    mode: FormulaMode,
    degenerate: usize,
    depth: usize,
    operators: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str, mode: FormulaMode) -> Self {
        Self {
            input,
            pos: 0,
            mode,
            degenerate: 0,
            depth: 0,
            operators: 0,
        }
    }

    /// Parse the whole input, returning the tree and the number of
    /// subtrees that were replaced by [`Expr::Degenerate`].
    pub(crate) fn parse(mut self) -> Result<(Expr, usize), ParseError> {
        let expr = self.parse_expression(0)?;
        if self.mode == FormulaMode::Strict {
            if let Some(c) = self.peek() {
                return Err(self.unexpected(self.pos, c));
            }
        }
        Ok((expr, self.degenerate))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn precedence_at(&self) -> u8 {
        self.peek()
            .and_then(BinaryOp::from_symbol)
            .map_or(0, BinaryOp::precedence)
    }

    fn parse_expression(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return self.abandon("formula nests too deeply");
        }
        self.depth += 1;
        let result = self.fold_operators(min_precedence);
        self.depth -= 1;
        result
    }

    fn fold_operators(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut expr = self.null_denotation()?;
        while self.precedence_at() > min_precedence {
            expr = self.left_denotation(expr)?;
        }
        Ok(expr)
    }

    fn left_denotation(&mut self, left: Expr) -> Result<Expr, ParseError> {
        let start = self.pos;
        let Some(op) = self.peek().and_then(BinaryOp::from_symbol) else {
            return self.degenerate(start, "expected an operator");
        };
        if !self.count_operator() {
            return self.abandon("formula has too many operators");
        }
        self.pos += 1;
        let right = self.parse_expression(op.precedence())?;
        Ok(Expr::binary(op, left, right))
    }

    fn null_denotation(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.degenerate(start, "unexpected end of formula");
        };

        match c {
            '0'..='9' => self.constant(),
            'G' => {
                self.pos += 1;
                Ok(Expr::Variable(Variable::G))
            }
            'H' => {
                self.pos += 1;
                Ok(Expr::Variable(Variable::H))
            }
            'i' if self.input[self.pos..].starts_with("if") => self.conditional(),
            '(' => {
                self.pos += 1;
                let inner = self.parse_expression(0)?;
                if self.expect(')')? {
                    Ok(inner)
                } else {
                    Ok(Expr::Degenerate)
                }
            }
            _ => match BinaryOp::from_symbol(c) {
                Some(op) if self.mode == FormulaMode::Lenient => {
                    self.pos += 1;
                    self.parse_expression(op.precedence())
                }
                Some(_) => self.degenerate(
                    start,
                    format!("expected an operand but found operator '{c}'"),
                ),
                None => {
                    let err = self.unexpected(start, c);
                    self.pos += c.len_utf8();
                    self.degenerate(err.position, err.message)
                }
            },
        }
    }

    fn constant(&mut self) -> Result<Expr, ParseError> {
        let input = self.input;
        let start = self.pos;
        self.skip_digits();
        if self.peek() == Some('.') {
            self.pos += 1;
            let fraction = self.pos;
            self.skip_digits();
            if self.pos == fraction {
                return self.degenerate(fraction, "expected digits after decimal point");
            }
        }

        let text = &input[start..self.pos];
        match text.parse::<f64>() {
            Ok(value) => Ok(Expr::Constant(value)),
            Err(_) => self.degenerate(start, format!("invalid number '{text}'")),
        }
    }

    fn conditional(&mut self) -> Result<Expr, ParseError> {
        if !self.count_operator() {
            return self.abandon("formula has too many operators");
        }
        self.pos += "if".len();
        if !self.expect('(')? {
            return Ok(Expr::Degenerate);
        }
        let condition = self.parse_expression(0)?;
        let first = self.expect(',')?;
        let then_branch = self.parse_expression(0)?;
        let second = self.expect(',')?;
        let else_branch = self.parse_expression(0)?;
        let closed = self.expect(')')?;

        if first && second && closed {
            Ok(Expr::conditional(condition, then_branch, else_branch))
        } else {
            Ok(Expr::Degenerate)
        }
    }

    fn count_operator(&mut self) -> bool {
        if self.operators >= MAX_OPERATORS {
            return false;
        }
        self.operators += 1;
        true
    }

    /// Give up on the rest of the input. Lenient parsing sees end of input
    /// afterwards, so enclosing levels unwind without further recursion.
    fn abandon(&mut self, message: &str) -> Result<Expr, ParseError> {
        let position = self.pos;
        self.pos = self.input.len();
        self.degenerate(position, message)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    /// Consume `expected` if it is next. In lenient mode a mismatch is
    /// recorded and reported as `Ok(false)` without consuming anything.
    fn expect(&mut self, expected: char) -> Result<bool, ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return Ok(true);
        }
        let found = match self.peek() {
            Some(c) => format!("'{c}'"),
            None => "end of formula".to_string(),
        };
        self.degenerate(self.pos, format!("expected '{expected}' but found {found}"))
            .map(|_| false)
    }

    fn unexpected(&self, position: usize, c: char) -> ParseError {
        let message = if c.is_whitespace() {
            "whitespace is not allowed in formulas".to_string()
        } else {
            format!("unexpected character '{c}'")
        };
        ParseError { position, message }
    }

    fn degenerate(
        &mut self,
        position: usize,
        message: impl Into<String>,
    ) -> Result<Expr, ParseError> {
        match self.mode {
            FormulaMode::Strict => Err(ParseError {
                position,
                message: message.into(),
            }),
            FormulaMode::Lenient => {
                self.degenerate += 1;
                Ok(Expr::Degenerate)
            }
        }
    }
}
