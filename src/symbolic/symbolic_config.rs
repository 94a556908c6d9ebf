use crate::error::FormatError;
use crate::network::{BooleanNetwork, UpdateRule};
use crate::state::State;
use biodivine_lib_param_bn::biodivine_std::traits::Set;
use biodivine_lib_param_bn::symbolic_async_graph::{GraphColoredVertices, SymbolicAsyncGraph};
use biodivine_lib_param_bn::{RegulatoryGraph, VariableId};
use std::collections::BTreeSet;

/// A configuration object for symbolic attractor detection.
#[derive(Clone)]
pub struct SymbolicConfig {
    /// The asynchronous graph of the converted network.
    pub graph: SymbolicAsyncGraph,
    /// Symbolic variables in the order of the explicit network variables.
    pub variables: Vec<VariableId>,
}

impl TryFrom<&BooleanNetwork> for SymbolicConfig {
    type Error = FormatError;

    fn try_from(value: &BooleanNetwork) -> Result<Self, Self::Error> {
        SymbolicConfig::new(value)
    }
}

impl SymbolicConfig {
    pub fn new(network: &BooleanNetwork) -> Result<SymbolicConfig, FormatError> {
        let symbolic = to_symbolic_network(network)?;
        let variables = network
            .variables()
            .iter()
            .map(|name| {
                symbolic
                    .as_graph()
                    .find_variable(name)
                    .ok_or_else(|| FormatError::UnknownVariable(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let graph = SymbolicAsyncGraph::new(&symbolic).map_err(FormatError::Network)?;
        Ok(SymbolicConfig { graph, variables })
    }

    /// Enumerate the explicit states of a symbolic set.
    ///
    /// The set is split on one variable at a time, so the work is proportional to the
    /// number of states in the set rather than to the whole state space.
    pub fn to_states(&self, set: &GraphColoredVertices) -> Vec<State> {
        let mut result = Vec::new();
        let mut stack = vec![(set.clone(), 0usize, 0u64)];
        while let Some((set, depth, bits)) = stack.pop() {
            if set.is_empty() {
                continue;
            }
            if depth == self.variables.len() {
                result.push(State::from_bits(bits, self.variables.len()));
                continue;
            }
            let var = self.variables[depth];
            for value in [false, true] {
                let half = set.intersect(&self.graph.mk_subspace(&[(var, value)]));
                stack.push((half, depth + 1, (bits << 1) | u64::from(value)));
            }
        }
        result.sort_unstable();
        result
    }
}

/// Convert a network into a `biodivine-lib-param-bn` network with the same asynchronous
/// dynamics.
///
/// Expression rules are copied verbatim. Truth tables become a disjunction of their true
/// rows; rows without a value (and variables without a rule) keep the current value.
pub fn to_symbolic_network(
    network: &BooleanNetwork,
) -> Result<biodivine_lib_param_bn::BooleanNetwork, FormatError> {
    let names = network.variables();
    let mut functions = Vec::with_capacity(names.len());
    let mut regulators = Vec::with_capacity(names.len());
    for (var, name) in names.iter().enumerate() {
        let (function, inputs) = match network.rule(var) {
            Some(UpdateRule::Expression(expression)) => (
                expression.expression().to_aeon_string(),
                expression.support(),
            ),
            Some(UpdateRule::Table(table)) => {
                let mut inputs: BTreeSet<usize> = table.inputs().iter().copied().collect();
                let mut terms = Vec::new();
                for row in 0..table.num_rows() {
                    let literals: Vec<String> = table
                        .inputs()
                        .iter()
                        .enumerate()
                        .map(|(i, input)| {
                            let bit = (row >> (table.inputs().len() - 1 - i)) & 1 == 1;
                            if bit {
                                names[*input].clone()
                            } else {
                                format!("!{}", names[*input])
                            }
                        })
                        .collect();
                    let term = match table.row(row) {
                        Some(true) => literals,
                        Some(false) => continue,
                        None => {
                            inputs.insert(var);
                            let mut literals = literals;
                            literals.push(name.clone());
                            literals
                        }
                    };
                    if term.is_empty() {
                        terms.push("true".to_string());
                    } else {
                        terms.push(format!("({})", term.join(" & ")));
                    }
                }
                let function = if terms.is_empty() {
                    "false".to_string()
                } else {
                    terms.join(" | ")
                };
                (function, inputs)
            }
            None => (name.clone(), BTreeSet::from([var])),
        };
        functions.push(function);
        regulators.push(inputs);
    }

    let mut graph = RegulatoryGraph::new(names.to_vec());
    for (target, inputs) in regulators.iter().enumerate() {
        for input in inputs {
            graph
                .add_regulation(&names[*input], &names[target], false, None)
                .map_err(FormatError::Network)?;
        }
    }
    let mut result = biodivine_lib_param_bn::BooleanNetwork::new(graph);
    for (name, function) in names.iter().zip(&functions) {
        result
            .add_string_update_function(name, function)
            .map_err(FormatError::Network)?;
    }
    Ok(result)
}
