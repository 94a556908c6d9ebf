use crate::error::FormatError;
use crate::expression::Expression;
use crate::state::State;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// An [`Expression`] whose variable names are resolved to positions in a [`State`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundExpression {
    source: Expression,
    root: Node,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    Constant(bool),
    Variable(usize),
    Not(Box<Node>),
    And(Vec<Node>),
    Or(Vec<Node>),
}

impl BoundExpression {
    /// Resolve `expression` against the given variable ordering.
    ///
    /// Fails with [`FormatError::UnknownVariable`] if the expression references a variable
    /// that is not declared in `variables`.
    pub fn bind(
        expression: &Expression,
        variables: &[String],
    ) -> Result<BoundExpression, FormatError> {
        Ok(BoundExpression {
            root: Node::bind(expression, variables)?,
            source: expression.clone(),
        })
    }

    pub fn eval(&self, state: State) -> bool {
        self.root.eval(state)
    }

    pub fn expression(&self) -> &Expression {
        &self.source
    }

    /// Positions of all variables that appear in the expression.
    pub fn support(&self) -> BTreeSet<usize> {
        let mut result = BTreeSet::new();
        self.root.collect_support(&mut result);
        result
    }
}

impl Node {
    fn bind(expression: &Expression, variables: &[String]) -> Result<Node, FormatError> {
        Ok(match expression {
            Expression::Constant(value) => Node::Constant(*value),
            Expression::Variable(name) => {
                let index = variables
                    .iter()
                    .position(|it| it == name)
                    .ok_or_else(|| FormatError::UnknownVariable(name.clone()))?;
                Node::Variable(index)
            }
            Expression::Not(inner) => Node::Not(Box::new(Node::bind(inner, variables)?)),
            Expression::And(args) => Node::And(
                args.iter()
                    .map(|it| Node::bind(it, variables))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Expression::Or(args) => Node::Or(
                args.iter()
                    .map(|it| Node::bind(it, variables))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    fn eval(&self, state: State) -> bool {
        match self {
            Node::Constant(value) => *value,
            Node::Variable(index) => state.get(*index),
            Node::Not(inner) => !inner.eval(state),
            Node::And(args) => args.iter().all(|it| it.eval(state)),
            Node::Or(args) => args.iter().any(|it| it.eval(state)),
        }
    }

    fn collect_support(&self, into: &mut BTreeSet<usize>) {
        match self {
            Node::Constant(_) => (),
            Node::Variable(index) => {
                into.insert(*index);
            }
            Node::Not(inner) => inner.collect_support(into),
            Node::And(args) | Node::Or(args) => {
                for arg in args {
                    arg.collect_support(into);
                }
            }
        }
    }
}

impl Display for BoundExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
