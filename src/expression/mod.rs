//! Boolean update expressions.
//!
//! Expressions are literals (variable names, possibly negated using `~` or `!`) combined
//! using `&` and `|` with parenthesized grouping. `&` binds tighter than `|`. Constants
//! are written as `0`/`1` (or `false`/`true`).
//!
//! An [`Expression`] is parsed once and then evaluated many times. When the variable
//! ordering of a network is known, the expression should additionally be converted into
//! a [`BoundExpression`], which resolves variable names into state positions so that
//! evaluation over packed [`crate::state::State`] values performs no lookups.
//!
//! ```
//! use biodivine_algo_bn_dynamics::expression::Expression;
//! use std::collections::HashMap;
//!
//! let expr = Expression::parse("x1 & ~(x2 | x3)").unwrap();
//! let assignment = HashMap::from([("x1", true), ("x2", false), ("x3", false)]);
//! assert!(expr.evaluate(&assignment).unwrap());
//! ```

mod bound;
mod parser;

#[cfg(test)]
mod tests;

use crate::error::FormatError;
pub use bound::BoundExpression;
pub use parser::MAX_NESTING;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A parsed Boolean expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    Constant(bool),
    Variable(String),
    Not(Box<Expression>),
    And(Vec<Expression>),
    Or(Vec<Expression>),
}

/// Anything that can supply named Boolean values to [`Expression::evaluate`].
pub trait Assignment {
    fn value(&self, name: &str) -> Option<bool>;
}

impl Assignment for HashMap<String, bool> {
    fn value(&self, name: &str) -> Option<bool> {
        self.get(name).copied()
    }
}

impl Assignment for HashMap<&str, bool> {
    fn value(&self, name: &str) -> Option<bool> {
        self.get(name).copied()
    }
}

impl Assignment for BTreeMap<String, bool> {
    fn value(&self, name: &str) -> Option<bool> {
        self.get(name).copied()
    }
}

impl Assignment for [(&str, bool)] {
    fn value(&self, name: &str) -> Option<bool> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

impl Expression {
    /// Parse an expression from its textual form.
    pub fn parse(value: &str) -> Result<Expression, FormatError> {
        parser::parse(value)
    }

    /// Evaluate the expression. Fails if a referenced variable has no value in `assignment`.
    pub fn evaluate<A: Assignment + ?Sized>(&self, assignment: &A) -> Result<bool, FormatError> {
        match self {
            Expression::Constant(value) => Ok(*value),
            Expression::Variable(name) => assignment
                .value(name)
                .ok_or_else(|| FormatError::MissingVariable(name.clone())),
            Expression::Not(inner) => Ok(!inner.evaluate(assignment)?),
            Expression::And(args) => {
                // Evaluate every operand so that missing variables are always reported.
                let mut result = true;
                for arg in args {
                    result &= arg.evaluate(assignment)?;
                }
                Ok(result)
            }
            Expression::Or(args) => {
                let mut result = false;
                for arg in args {
                    result |= arg.evaluate(assignment)?;
                }
                Ok(result)
            }
        }
    }

    /// Names of all variables referenced by this expression.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        self.collect_variables(&mut result);
        result
    }

    fn collect_variables(&self, into: &mut BTreeSet<String>) {
        match self {
            Expression::Constant(_) => (),
            Expression::Variable(name) => {
                into.insert(name.clone());
            }
            Expression::Not(inner) => inner.collect_variables(into),
            Expression::And(args) | Expression::Or(args) => {
                for arg in args {
                    arg.collect_variables(into);
                }
            }
        }
    }

    /// Render the expression using the syntax of `biodivine-lib-param-bn` update functions.
    pub fn to_aeon_string(&self) -> String {
        match self {
            Expression::Constant(true) => "true".to_string(),
            Expression::Constant(false) => "false".to_string(),
            Expression::Variable(name) => name.clone(),
            Expression::Not(inner) => format!("!{}", inner.to_aeon_atom()),
            Expression::And(args) => join_args(args, " & ", Expression::to_aeon_atom),
            Expression::Or(args) => join_args(args, " | ", Expression::to_aeon_atom),
        }
    }

    fn to_aeon_atom(&self) -> String {
        match self {
            Expression::And(_) | Expression::Or(_) => format!("({})", self.to_aeon_string()),
            _ => self.to_aeon_string(),
        }
    }

    fn fmt_atom(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::And(_) | Expression::Or(_) => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

fn join_args(args: &[Expression], separator: &str, render: fn(&Expression) -> String) -> String {
    args.iter().map(render).collect::<Vec<_>>().join(separator)
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Constant(value) => f.write_str(if *value { "1" } else { "0" }),
            Expression::Variable(name) => f.write_str(name),
            Expression::Not(inner) => {
                f.write_str("~")?;
                inner.fmt_atom(f)
            }
            Expression::And(args) | Expression::Or(args) => {
                let separator = if matches!(self, Expression::And(_)) {
                    " & "
                } else {
                    " | "
                };
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator)?;
                    }
                    arg.fmt_atom(f)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Expression {
    type Err = FormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Expression::parse(value)
    }
}

/// Parse and evaluate `expression` in one go.
///
/// Prefer [`Expression::parse`] followed by repeated [`Expression::evaluate`] calls when the
/// same expression is evaluated more than once.
pub fn evaluate<A: Assignment + ?Sized>(
    expression: &str,
    assignment: &A,
) -> Result<bool, FormatError> {
    Expression::parse(expression)?.evaluate(assignment)
}
