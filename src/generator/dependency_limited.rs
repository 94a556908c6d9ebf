use crate::error::PipelineError;
use crate::generator::NetworkConfig;
use crate::network::{BooleanNetwork, TruthTable, UpdateRule};
use crate::transition::{TransitionRelation, UpdateMode, build_relation};
use log::trace;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use std::collections::BTreeMap;

/// Build a network where every rule is a random truth table over at most `num_deps`
/// variables, together with its asynchronous relation.
pub(super) fn generate(
    config: &NetworkConfig,
    rng: &mut StdRng,
) -> Result<(BooleanNetwork, TransitionRelation), PipelineError> {
    let width = config.num_vars;
    let names: Vec<String> = (1..=width).map(|i| format!("x{i}")).collect();
    let mut network = BooleanNetwork::new(names.clone())?;
    for name in &names {
        let mut inputs = sample(rng, width, config.num_deps.min(width)).into_vec();
        inputs.sort_unstable();
        let rows = 1usize << inputs.len();
        let upper = config.max_true_outputs.min(rows - 1);
        let lower = config.min_true_outputs.min(upper);
        let ones = rng.gen_range(lower..=upper);
        let mut outputs = vec![false; rows];
        for row in sample(rng, rows, ones).into_vec() {
            outputs[row] = true;
        }
        trace!("Rule of `{name}` has inputs {inputs:?} and {ones} true rows.");
        let table = TruthTable::from_outputs(inputs, outputs)?;
        network.set_table(name, table)?;
    }
    let relation = build_relation(&network, UpdateMode::Asynchronous)?;
    Ok((network, relation))
}

/// Render every truth-table rule as an unminimized sum of products, one term per true row.
/// A rule without true rows is rendered as `0`.
pub(super) fn sop_expressions(network: &BooleanNetwork) -> BTreeMap<String, String> {
    let names = network.variables();
    let mut result = BTreeMap::new();
    for (var, name) in names.iter().enumerate() {
        let Some(UpdateRule::Table(table)) = network.rule(var) else {
            continue;
        };
        let width = table.inputs().len();
        let terms: Vec<String> = table
            .minterms()
            .into_iter()
            .map(|row| {
                let literals: Vec<String> = table
                    .inputs()
                    .iter()
                    .enumerate()
                    .map(|(i, input)| {
                        if (row >> (width - 1 - i)) & 1 == 1 {
                            names[*input].clone()
                        } else {
                            format!("~{}", names[*input])
                        }
                    })
                    .collect();
                format!("({})", literals.join(" & "))
            })
            .collect();
        let expression = if terms.is_empty() {
            "0".to_string()
        } else {
            terms.join(" | ")
        };
        result.insert(name.clone(), expression);
    }
    result
}
