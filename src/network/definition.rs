use crate::error::FormatError;
use crate::expression::Expression;
use crate::network::{BooleanNetwork, TruthTable, UpdateRule, natural_cmp};
use crate::transition::{TransitionRelation, UpdateMode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A flat, named network artifact.
///
/// The artifact carries update `functions` (and/or truth `tables`) and/or an explicit
/// `transitions` listing. Loading is plain deserialization followed by validation.
///
/// ```json
/// {
///   "name": "toggle",
///   "functions": { "x1": "~x2", "x2": "~x1" },
///   "transitions": { "00": ["01", "10"], "01": [], "10": [], "11": ["01", "10"] }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit variable ordering. When empty, names used by `functions` and `tables` are
    /// ordered naturally; a transitions-only artifact uses `x1 .. xn`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<String>,
    /// Update semantics of the `transitions` listing (default: asynchronous).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<UpdateMode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tables: BTreeMap<String, TableDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transitions: BTreeMap<String, Vec<String>>,
}

/// A truth table over named inputs; keys of `outputs` are input bit strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub inputs: Vec<String>,
    pub outputs: BTreeMap<String, u8>,
}

impl NetworkDefinition {
    pub fn from_json(json: &str) -> Result<NetworkDefinition, FormatError> {
        let definition: NetworkDefinition = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe `network` (and optionally its transition `relation`) as an artifact.
    pub fn from_network(
        network: &BooleanNetwork,
        relation: Option<&TransitionRelation>,
    ) -> NetworkDefinition {
        let mut definition = NetworkDefinition {
            name: network.name().map(|it| it.to_string()),
            variables: network.variables().to_vec(),
            ..Default::default()
        };
        for (index, name) in network.variables().iter().enumerate() {
            match network.rule(index) {
                Some(UpdateRule::Expression(expression)) => {
                    definition
                        .functions
                        .insert(name.clone(), expression.to_string());
                }
                Some(UpdateRule::Table(table)) => {
                    definition
                        .tables
                        .insert(name.clone(), TableDefinition::from_table(network, table));
                }
                None => (),
            }
        }
        if let Some(relation) = relation {
            definition.mode = Some(relation.mode());
            definition.transitions = relation.to_string_lists();
        }
        definition
    }

    /// Check that the artifact is internally consistent.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.functions.is_empty() && self.tables.is_empty() && self.transitions.is_empty() {
            return Err(FormatError::Network(
                "definition has neither functions nor transitions".to_string(),
            ));
        }
        if let Some(name) = self.functions.keys().find(|it| self.tables.contains_key(*it)) {
            return Err(FormatError::Network(format!(
                "`{name}` has both a function and a table"
            )));
        }
        self.network()?;
        let relation = self.relation()?;
        if let Some(relation) = relation {
            let order = self.variable_order()?;
            if order.len() != relation.width() {
                return Err(FormatError::Network(format!(
                    "{} variables declared, but transitions use states of width {}",
                    order.len(),
                    relation.width()
                )));
            }
        }
        Ok(())
    }

    /// The variable ordering used by this artifact.
    pub fn variable_order(&self) -> Result<Vec<String>, FormatError> {
        if !self.variables.is_empty() {
            return Ok(self.variables.clone());
        }
        let mut names: BTreeSet<&String> = self.functions.keys().collect();
        names.extend(self.tables.keys());
        if !names.is_empty() {
            let mut names: Vec<String> = names.into_iter().cloned().collect();
            names.sort_by(|a, b| natural_cmp(a, b));
            return Ok(names);
        }
        match self.transitions.keys().next() {
            Some(state) => Ok((1..=state.len()).map(|i| format!("x{i}")).collect()),
            None => Err(FormatError::Network("cannot infer variables".to_string())),
        }
    }

    /// The network given by `functions` and `tables`, if there are any.
    pub fn network(&self) -> Result<Option<BooleanNetwork>, FormatError> {
        if self.functions.is_empty() && self.tables.is_empty() {
            return Ok(None);
        }
        let mut network = BooleanNetwork::new(self.variable_order()?)?;
        if let Some(name) = &self.name {
            network = network.with_name(name);
        }
        for (name, function) in &self.functions {
            let expression = Expression::parse(function)?;
            network.set_rule_expression(name, &expression)?;
        }
        for (name, table) in &self.tables {
            let table = table.to_table(&network)?;
            network.set_table(name, table)?;
        }
        Ok(Some(network))
    }

    /// The explicit transition listing, if there is one.
    pub fn relation(&self) -> Result<Option<TransitionRelation>, FormatError> {
        if self.transitions.is_empty() {
            return Ok(None);
        }
        let mode = self.mode.unwrap_or_default();
        TransitionRelation::from_string_lists(mode, &self.transitions).map(Some)
    }
}

impl TableDefinition {
    fn from_table(network: &BooleanNetwork, table: &TruthTable) -> TableDefinition {
        let width = table.inputs().len();
        let inputs = table
            .inputs()
            .iter()
            .map(|it| network.variables()[*it].clone())
            .collect();
        let outputs = (0..table.num_rows())
            .filter_map(|row| {
                table
                    .row(row)
                    .map(|value| (row_bits(row as u64, width), u8::from(value)))
            })
            .collect();
        TableDefinition { inputs, outputs }
    }

    fn to_table(&self, network: &BooleanNetwork) -> Result<TruthTable, FormatError> {
        let inputs = self
            .inputs
            .iter()
            .map(|name| {
                network
                    .find_variable(name)
                    .ok_or_else(|| FormatError::UnknownVariable(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut table = TruthTable::new(inputs)?;
        for (bits, value) in &self.outputs {
            let value = match value {
                0 => false,
                1 => true,
                _ => {
                    return Err(FormatError::Network(format!(
                        "table output for `{bits}` must be 0 or 1"
                    )));
                }
            };
            table.set_row_bits(bits, value)?;
        }
        Ok(table)
    }
}

/// Render `row` as a bit string of the given width (first input is the leftmost bit).
fn row_bits(row: u64, width: usize) -> String {
    (0..width)
        .map(|i| if (row >> (width - 1 - i)) & 1 == 1 { '1' } else { '0' })
        .collect()
}
