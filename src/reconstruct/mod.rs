//! Recovering update functions from observed dynamics.
//!
//! [`ObservedFunctions`] reads the next value of every variable in every state directly
//! from a [`TransitionRelation`]. Under synchronous update, this is the corresponding bit of
//! the (single) successor. Under asynchronous update, variable `i` flips exactly when the
//! state has a successor that differs only in bit `i`. A state that does not determine the
//! next value (no successor, or no flip of the variable) falls back to identity.
//!
//! The observed functions are then minimized into sums of products using the
//! Quine-McCluskey procedure (see [`minimize`]) and can be turned back into a
//! [`BooleanNetwork`]. Rebuilding the relation of such a network in the same update mode
//! gives the original relation.

mod quine_mccluskey;

#[cfg(test)]
mod tests;

use crate::error::{FormatError, PipelineError};
use crate::network::{BooleanNetwork, TruthTable};
use crate::state::State;
use crate::transition::{TransitionRelation, UpdateMode, build_relation};
use log::debug;
pub use quine_mccluskey::{Implicant, format_sop, minimize, prime_implicants, sop_expression};
use std::collections::{BTreeMap, BTreeSet};

/// The next value of every variable in every state, as observed in a relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedFunctions {
    width: usize,
    /// `outputs[var][state.index()]`.
    outputs: Vec<Vec<bool>>,
}

impl ObservedFunctions {
    pub fn from_relation(relation: &TransitionRelation) -> ObservedFunctions {
        let width = relation.width();
        let mut outputs: Vec<Vec<bool>> = (0..width)
            .map(|var| relation.states().map(|s| s.get(var)).collect())
            .collect();
        let mut undetermined = 0usize;
        for (state, successors) in relation.iter() {
            match relation.mode() {
                UpdateMode::Synchronous => {
                    // An empty successor set is a fixed point, so identity is correct.
                    if let Some(next) = successors.first() {
                        for (var, output) in outputs.iter_mut().enumerate() {
                            output[state.index()] = next.get(var);
                        }
                    }
                    if successors.len() > 1 {
                        undetermined += 1;
                    }
                }
                UpdateMode::Asynchronous => {
                    for next in successors {
                        let diff = state.bits() ^ next.bits();
                        if diff.count_ones() == 1 {
                            let var = width - 1 - diff.trailing_zeros() as usize;
                            outputs[var][state.index()] = next.get(var);
                        } else {
                            undetermined += 1;
                        }
                    }
                }
            }
        }
        if undetermined > 0 {
            debug!(
                "Ignored {} transitions that do not match the update mode.",
                undetermined
            );
        }
        ObservedFunctions { width, outputs }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn output(&self, var: usize, state: State) -> bool {
        self.outputs[var][state.index()]
    }

    /// The synchronous successor of `state` (all variables updated at once).
    pub fn next_state(&self, state: State) -> State {
        let mut next = state;
        for var in 0..self.width {
            next = next.set(var, self.output(var, state));
        }
        next
    }

    /// Variables whose value influences the output of `target`.
    pub fn dependencies(&self, target: usize) -> Vec<usize> {
        let output = &self.outputs[target];
        (0..self.width)
            .filter(|regulator| {
                State::all(self.width).any(|state| {
                    let flipped = state.flip(*regulator);
                    output[state.index()] != output[flipped.index()]
                })
            })
            .collect()
    }

    /// All `(regulator, target)` dependency pairs.
    pub fn regulations(&self) -> BTreeSet<(usize, usize)> {
        let mut result = BTreeSet::new();
        for target in 0..self.width {
            for regulator in self.dependencies(target) {
                result.insert((regulator, target));
            }
        }
        result
    }

    /// The output of `target` as a table over its dependencies only.
    pub fn table(&self, target: usize) -> Result<TruthTable, FormatError> {
        let inputs = self.dependencies(target);
        let outputs = (0..1u64 << inputs.len())
            .map(|row| {
                let mut state = State::from_bits(0, self.width);
                for (i, input) in inputs.iter().enumerate() {
                    let value = (row >> (inputs.len() - 1 - i)) & 1 == 1;
                    state = state.set(*input, value);
                }
                self.output(target, state)
            })
            .collect();
        TruthTable::from_outputs(inputs, outputs)
    }

    /// Minimized expression of every variable, keyed by variable name.
    pub fn expressions(&self, names: &[String]) -> Result<BTreeMap<String, String>, FormatError> {
        check_names(self.width, names)?;
        let mut result = BTreeMap::new();
        for (target, name) in names.iter().enumerate() {
            let table = self.table(target)?;
            let inputs: Vec<String> = table.inputs().iter().map(|i| names[*i].clone()).collect();
            result.insert(name.clone(), sop_expression(&table.minterms(), &inputs));
        }
        Ok(result)
    }
}

fn check_names(width: usize, names: &[String]) -> Result<(), FormatError> {
    if names.len() != width {
        return Err(FormatError::Network(format!(
            "expected {} variable names, got {}",
            width,
            names.len()
        )));
    }
    Ok(())
}

/// Reconstruct a network with minimized expression rules from a full relation.
pub fn reconstruct_network(
    relation: &TransitionRelation,
    names: &[String],
) -> Result<BooleanNetwork, FormatError> {
    let functions = ObservedFunctions::from_relation(relation);
    let expressions = functions.expressions(names)?;
    let mut network = BooleanNetwork::new(names.to_vec())?;
    for (name, expression) in &expressions {
        network.set_expression(name, expression)?;
    }
    debug!(
        "Reconstructed {} rules with {} regulations.",
        expressions.len(),
        functions.regulations().len()
    );
    Ok(network)
}

/// Minimize every rule of `network` over the variables it actually depends on.
///
/// Missing rules and undefined table rows keep the current value, so the simplified
/// network has the same dynamics as the input in both update modes.
pub fn simplify(network: &BooleanNetwork) -> Result<BTreeMap<String, String>, PipelineError> {
    let relation = build_relation(network, UpdateMode::Synchronous)?;
    Ok(ObservedFunctions::from_relation(&relation).expressions(network.variables())?)
}
