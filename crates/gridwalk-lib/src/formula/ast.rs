use std::fmt;

/// Search quantities a formula may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// Accumulated path cost from the start cell.
    G,
    /// Heuristic estimate of the remaining cost.
    H,
}

/// Binary operators understood by the formula language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    /// Yields `1.0` when the left operand is smaller, `0.0` otherwise.
    LessThan,
}

impl BinaryOp {
    /// Map an operator character to its operator, if it is one.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Subtract),
            '*' => Some(BinaryOp::Multiply),
            '<' => Some(BinaryOp::LessThan),
            _ => None,
        }
    }

    /// Binding power used by the parser; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Multiply => 30,
            BinaryOp::Add | BinaryOp::Subtract => 20,
            BinaryOp::LessThan => 10,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::LessThan => '<',
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Subtract => left - right,
            BinaryOp::Multiply => left * right,
            BinaryOp::LessThan => {
                if left < right {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Syntax tree of a priority formula.
///
/// Every node exclusively owns its children, so a tree is torn down in one
/// drop regardless of how parsing ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(f64),
    Variable(Variable),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Placeholder for a subtree that failed to parse in lenient mode.
    ///
    /// Evaluates to [`f64::MAX`] so that affected nodes sink to the back of
    /// the open list instead of aborting the search.
    Degenerate,
}

impl Expr {
    /// Build a binary node; a degenerate operand makes the whole node degenerate.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        if left.is_degenerate_node() || right.is_degenerate_node() {
            return Expr::Degenerate;
        }
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a conditional node; any degenerate part makes the whole node degenerate.
    pub fn conditional(condition: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        if condition.is_degenerate_node()
            || then_branch.is_degenerate_node()
            || else_branch.is_degenerate_node()
        {
            return Expr::Degenerate;
        }
        Expr::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    /// Evaluate the tree for concrete `g` and `h` values.
    ///
    /// Conditionals treat any non-zero condition as true.
    pub fn evaluate(&self, g: u64, h: u64) -> f64 {
        match self {
            Expr::Constant(value) => *value,
            Expr::Variable(Variable::G) => g as f64,
            Expr::Variable(Variable::H) => h as f64,
            Expr::Binary { op, left, right } => op.apply(left.evaluate(g, h), right.evaluate(g, h)),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if condition.evaluate(g, h) != 0.0 {
                    then_branch.evaluate(g, h)
                } else {
                    else_branch.evaluate(g, h)
                }
            }
            Expr::Degenerate => f64::MAX,
        }
    }

    /// Whether any subtree failed to parse.
    pub fn contains_degenerate(&self) -> bool {
        match self {
            Expr::Constant(_) | Expr::Variable(_) => false,
            Expr::Binary { left, right, .. } => {
                left.contains_degenerate() || right.contains_degenerate()
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                condition.contains_degenerate()
                    || then_branch.contains_degenerate()
                    || else_branch.contains_degenerate()
            }
            Expr::Degenerate => true,
        }
    }

    fn is_degenerate_node(&self) -> bool {
        matches!(self, Expr::Degenerate)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::G => f.write_str("G"),
            Variable::H => f.write_str("H"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Variable(variable) => write!(f, "{variable}"),
            Expr::Binary { op, left, right } => write!(f, "({left}{}{right})", op.symbol()),
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "if({condition},{then_branch},{else_branch})"),
            Expr::Degenerate => f.write_str("?"),
        }
    }
}
