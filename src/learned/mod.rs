//! Models produced by the external structure learner.
//!
//! The learner writes a Bayesian network in (a subset of) the BIF format. Only the
//! `probability` blocks are relevant here:
//!
//! ```text
//! probability ( x3 | x1 x2 ) {
//!   (0, 0) 0.9, 0.1;
//!   (1, 0) 0.2, 0.8;
//!   default 0.5, 0.5;
//! }
//! probability ( x1 ) {
//!   table 0.3, 0.7;
//! }
//! ```
//!
//! Every row is turned into a deterministic output: `1` when the probability of `1` is
//! strictly larger, `0` otherwise. `default` rows are ignored, so combinations that are
//! not listed stay undefined and the learned dynamics keep the current value there.


use crate::error::FormatError;
use crate::network::{BooleanNetwork, MAX_TABLE_INPUTS, TruthTable};
use crate::reconstruct::sop_expression;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// A deterministic conditional table of one learned variable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LearnedTable {
    pub parents: Vec<String>,
    /// Output per parent value signature (e.g. `"01"` for two parents).
    pub rows: BTreeMap<String, bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LearnedModel {
    tables: BTreeMap<String, LearnedTable>,
}

impl LearnedModel {
    pub fn parse(content: &str) -> Result<LearnedModel, FormatError> {
        let mut tables: BTreeMap<String, LearnedTable> = BTreeMap::new();
        let mut current: Option<String> = None;
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            let error = |reason: &str| {
                FormatError::LearnedModel(format!("line {}: {reason} (`{line}`)", number + 1))
            };
            if let Some(header) = line.strip_prefix("probability") {
                let (child, parents) = parse_header(header).ok_or_else(|| error("bad header"))?;
                if tables.contains_key(&child) {
                    return Err(error("duplicate table"));
                }
                if parents.len() > MAX_TABLE_INPUTS {
                    return Err(error("too many parents"));
                }
                tables.insert(
                    child.clone(),
                    LearnedTable {
                        parents,
                        rows: BTreeMap::new(),
                    },
                );
                current = Some(child);
            } else if line.starts_with('}') {
                current = None;
            } else if let Some(child) = &current {
                let Some(table) = tables.get_mut(child) else {
                    continue;
                };
                if line.starts_with("default") {
                    continue;
                } else if let Some(values) = line.strip_prefix("table") {
                    if !table.parents.is_empty() {
                        return Err(error("`table` rows require a parentless variable"));
                    }
                    let output = parse_output(values).ok_or_else(|| error("bad probabilities"))?;
                    table.rows.insert(String::new(), output);
                } else if let Some(row) = line.strip_prefix('(') {
                    let (signature, values) =
                        row.split_once(')').ok_or_else(|| error("unclosed row"))?;
                    let signature: Vec<&str> = split_tokens(signature);
                    if signature.len() != table.parents.len()
                        || signature.iter().any(|it| *it != "0" && *it != "1")
                    {
                        return Err(error("row does not match the parents"));
                    }
                    let output = parse_output(values).ok_or_else(|| error("bad probabilities"))?;
                    table.rows.insert(signature.concat(), output);
                }
            }
        }
        debug!("Parsed learned model with {} tables.", tables.len());
        Ok(LearnedModel { tables })
    }

    pub fn tables(&self) -> &BTreeMap<String, LearnedTable> {
        &self.tables
    }

    pub fn table(&self, child: &str) -> Option<&LearnedTable> {
        self.tables.get(child)
    }

    /// All `(parent, child)` edges of the learned structure.
    pub fn edges(&self) -> BTreeSet<(String, String)> {
        self.tables
            .iter()
            .flat_map(|(child, table)| {
                table
                    .parents
                    .iter()
                    .map(move |parent| (parent.clone(), child.clone()))
            })
            .collect()
    }

    /// The learned dynamics over the given variable order.
    ///
    /// Variables without a table have no rule. Tables referencing unknown variables are
    /// rejected. Parentless variables without any row are also left without a rule.
    pub fn to_network(&self, variables: &[String]) -> Result<BooleanNetwork, FormatError> {
        let mut network = BooleanNetwork::new(variables.to_vec())?;
        for (child, table) in &self.tables {
            if network.find_variable(child).is_none() {
                return Err(FormatError::UnknownVariable(child.clone()));
            }
            let inputs = table
                .parents
                .iter()
                .map(|parent| {
                    network
                        .find_variable(parent)
                        .ok_or_else(|| FormatError::UnknownVariable(parent.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if table.rows.is_empty() {
                warn!("Learned table of `{child}` has no rows.");
                continue;
            }
            let mut rule = TruthTable::new(inputs)?;
            for (signature, output) in &table.rows {
                rule.set_row_bits(signature, *output)?;
            }
            network.set_table(child, rule)?;
        }
        Ok(network)
    }

    /// Minimized expressions of the learned tables. Unlisted rows count as `0`.
    pub fn expressions(&self) -> BTreeMap<String, String> {
        self.tables
            .iter()
            .filter(|(_, table)| !table.rows.is_empty())
            .map(|(child, table)| {
                let width = table.parents.len();
                let minterms: Vec<u64> = table
                    .rows
                    .iter()
                    .filter(|(_, output)| **output)
                    .filter_map(|(signature, _)| {
                        if width == 0 {
                            Some(0)
                        } else {
                            u64::from_str_radix(signature, 2).ok()
                        }
                    })
                    .collect();
                (child.clone(), sop_expression(&minterms, &table.parents))
            })
            .collect()
    }
}

impl FromStr for LearnedModel {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LearnedModel::parse(s)
    }
}

/// Split on whitespace, commas and quotes.
fn split_tokens(value: &str) -> Vec<&str> {
    value
        .split(|c: char| c.is_whitespace() || c == ',' || c == '"')
        .filter(|it| !it.is_empty())
        .collect()
}

/// Parse `( child | p1 p2 ) {` into the child and its parents.
fn parse_header(header: &str) -> Option<(String, Vec<String>)> {
    let header = header.trim().strip_prefix('(')?;
    let (inner, _) = header.split_once(')')?;
    let (child, parents) = match inner.split_once('|') {
        Some((child, parents)) => (child, split_tokens(parents)),
        None => (inner, Vec::new()),
    };
    let child = split_tokens(child);
    match child.as_slice() {
        [child] => Some((child.to_string(), parents.into_iter().map(String::from).collect())),
        _ => None,
    }
}

/// The deterministic output of `q0 q1;`.
fn parse_output(values: &str) -> Option<bool> {
    let tokens = split_tokens(values.trim().trim_end_matches(';'));
    let [.., q0, q1] = tokens.as_slice() else {
        return None;
    };
    let q0: f64 = q0.parse().ok()?;
    let q1: f64 = q1.parse().ok()?;
    Some(q1 > q0)
}
