//! Boolean networks with explicit per-variable update rules.
//!
//! A [`BooleanNetwork`] is an ordered list of variables, each with an optional
//! [`UpdateRule`]. A variable without a rule keeps its current value. The same holds
//! for input combinations that a [`TruthTable`] leaves undefined, which is the typical
//! situation for models produced by a structure learner.

mod definition;
mod truth_table;

#[cfg(test)]
mod tests;

use crate::error::FormatError;
use crate::expression::{BoundExpression, Expression};
use crate::state::{MAX_STATE_WIDTH, State};
pub use definition::{NetworkDefinition, TableDefinition};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::{Display, Formatter};
pub use truth_table::{MAX_TABLE_INPUTS, TruthTable};

/// An update function of a single variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateRule {
    Expression(BoundExpression),
    Table(TruthTable),
}

impl UpdateRule {
    /// The next value of the updated variable, or `None` when the rule does not determine
    /// it for this state.
    pub fn evaluate(&self, state: State) -> Option<bool> {
        match self {
            UpdateRule::Expression(expression) => Some(expression.eval(state)),
            UpdateRule::Table(table) => table.evaluate(state),
        }
    }

    /// Variables this rule reads (syntactically).
    pub fn inputs(&self) -> BTreeSet<usize> {
        match self {
            UpdateRule::Expression(expression) => expression.support(),
            UpdateRule::Table(table) => table.inputs().iter().copied().collect(),
        }
    }
}

impl Display for UpdateRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateRule::Expression(expression) => write!(f, "{expression}"),
            UpdateRule::Table(table) => write!(f, "{table}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BooleanNetwork {
    name: Option<String>,
    variables: Vec<String>,
    rules: Vec<Option<UpdateRule>>,
}

impl BooleanNetwork {
    /// Create a network with the given variables and no update rules.
    pub fn new(variables: Vec<String>) -> Result<BooleanNetwork, FormatError> {
        if variables.is_empty() {
            return Err(FormatError::Network("network has no variables".to_string()));
        }
        if variables.len() > MAX_STATE_WIDTH {
            return Err(FormatError::Network(format!(
                "network has {} variables, at most {MAX_STATE_WIDTH} are supported",
                variables.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in &variables {
            if !is_valid_name(name) {
                return Err(FormatError::Network(format!(
                    "`{name}` is not a valid variable name"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(FormatError::Network(format!("duplicate variable `{name}`")));
            }
        }
        Ok(BooleanNetwork {
            name: None,
            rules: vec![None; variables.len()],
            variables,
        })
    }

    /// Build a network from `(variable, expression)` pairs. Variables are ordered naturally
    /// by name (`x2` before `x10`).
    pub fn from_expressions<'a, I>(functions: I) -> Result<BooleanNetwork, FormatError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let functions: BTreeMap<&str, &str> = functions.into_iter().collect();
        let mut variables: Vec<String> = functions.keys().map(|it| it.to_string()).collect();
        variables.sort_by(|a, b| natural_cmp(a, b));
        let mut network = BooleanNetwork::new(variables)?;
        for (name, expression) in functions {
            network.set_expression(name, expression)?;
        }
        Ok(network)
    }

    pub fn with_name(mut self, name: &str) -> BooleanNetwork {
        self.name = Some(name.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn find_variable(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|it| it == name)
    }

    fn require_variable(&self, name: &str) -> Result<usize, FormatError> {
        self.find_variable(name)
            .ok_or_else(|| FormatError::UnknownVariable(name.to_string()))
    }

    /// Parse `expression` and use it as the update rule of `variable`.
    pub fn set_expression(&mut self, variable: &str, expression: &str) -> Result<(), FormatError> {
        let expression = Expression::parse(expression)?;
        self.set_rule_expression(variable, &expression)
    }

    pub fn set_rule_expression(
        &mut self,
        variable: &str,
        expression: &Expression,
    ) -> Result<(), FormatError> {
        let index = self.require_variable(variable)?;
        let bound = BoundExpression::bind(expression, &self.variables)?;
        self.rules[index] = Some(UpdateRule::Expression(bound));
        Ok(())
    }

    pub fn set_table(&mut self, variable: &str, table: TruthTable) -> Result<(), FormatError> {
        let index = self.require_variable(variable)?;
        if let Some(input) = table.inputs().iter().find(|it| **it >= self.num_vars()) {
            return Err(FormatError::Network(format!(
                "table of `{variable}` reads variable #{input}, but the network has only {} variables",
                self.num_vars()
            )));
        }
        self.rules[index] = Some(UpdateRule::Table(table));
        Ok(())
    }

    /// Remove the rule of `variable`, making it constant in the dynamics.
    pub fn clear_rule(&mut self, variable: &str) -> Result<(), FormatError> {
        let index = self.require_variable(variable)?;
        self.rules[index] = None;
        Ok(())
    }

    pub fn rule(&self, variable: usize) -> Option<&UpdateRule> {
        self.rules[variable].as_ref()
    }

    /// The next value of `variable` in `state`. Missing rules and undefined table rows
    /// keep the current value.
    pub fn next_value(&self, variable: usize, state: State) -> bool {
        self.rules[variable]
            .as_ref()
            .and_then(|rule| rule.evaluate(state))
            .unwrap_or_else(|| state.get(variable))
    }

    /// The syntactic regulators of every variable (as `(regulator, target)` index pairs).
    pub fn regulations(&self) -> BTreeSet<(usize, usize)> {
        let mut result = BTreeSet::new();
        for (target, rule) in self.rules.iter().enumerate() {
            if let Some(rule) = rule {
                for input in rule.inputs() {
                    result.insert((input, target));
                }
            }
        }
        result
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
        && !matches!(name, "true" | "false" | "True" | "False")
}

/// Compare variable names such that numeric suffixes are ordered by value (`x2 < x10`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    fn split(name: &str) -> (&str, Option<u64>) {
        let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (prefix, suffix) = name.split_at(name.len() - digits);
        (prefix, suffix.parse().ok())
    }
    split(a).cmp(&split(b)).then_with(|| a.cmp(b))
}
