use crate::error::FormatError;
use crate::generator::NetworkConfig;
use crate::generator::hypercube::{build_hamming_cycle, build_hamming_path};
use crate::log_states;
use crate::state::State;
use crate::transition::{TransitionRelation, UpdateMode};
use log::{debug, trace};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, BTreeSet};

/// Probability of an extra backbone edge for every backbone state.
const EXTRA_EDGE_PROBABILITY: f64 = 0.3;

pub(super) struct AttractorPlan {
    pub relation: TransitionRelation,
    pub attractors: Vec<Vec<State>>,
    pub parentless: Vec<State>,
}

/// Build a relation with planned attractors, source states and a strongly connected
/// backbone. With `full == false`, no source states are reserved and the backbone has no
/// extra edges.
pub(super) fn generate(
    config: &NetworkConfig,
    rng: &mut StdRng,
    full: bool,
) -> Result<AttractorPlan, FormatError> {
    let width = config.num_vars;
    let all: BTreeSet<State> = State::all(width).collect();
    let mut successors: BTreeMap<State, Vec<State>> = BTreeMap::new();
    let mut used: BTreeSet<State> = BTreeSet::new();

    let attractor_size = if full {
        config.attractor_size
    } else {
        config.attractor_size.min(all.len())
    };

    let mut attractors = Vec::new();
    for _ in 0..config.num_attractors {
        let available: Vec<State> = all.difference(&used).copied().collect();
        if available.is_empty() {
            break;
        }
        let cycle = build_hamming_cycle(rng, &available, attractor_size, &used);
        if cycle.len() < 2 {
            continue;
        }
        for (i, state) in cycle.iter().enumerate() {
            successors.insert(*state, vec![cycle[(i + 1) % cycle.len()]]);
        }
        used.extend(cycle.iter().copied());
        trace!("Planned attractor ({}).", log_states(&cycle));
        attractors.push(cycle);
    }

    let parentless: BTreeSet<State> = if full {
        let available: Vec<State> = all.difference(&used).copied().collect();
        let count = config.num_parentless.min(available.len());
        available.choose_multiple(rng, count).copied().collect()
    } else {
        BTreeSet::new()
    };
    used.extend(parentless.iter().copied());

    let backbone: BTreeSet<State> = all.difference(&used).copied().collect();
    let order = build_hamming_path(rng, &backbone);
    for (i, state) in order.iter().enumerate() {
        successors.insert(*state, vec![order[(i + 1) % order.len()]]);
    }
    debug!(
        "Backbone with {} states and {} planned attractors.",
        backbone.len(),
        attractors.len()
    );

    if full {
        for state in &backbone {
            let targets = successors.entry(*state).or_default();
            let candidates: Vec<State> = state
                .hamming_neighbors()
                .filter(|it| backbone.contains(it) && !targets.contains(it))
                .collect();
            if !candidates.is_empty() && rng.gen_bool(EXTRA_EDGE_PROBABILITY) {
                if let Some(extra) = candidates.choose(rng) {
                    targets.push(*extra);
                }
            }
        }
    }

    for attractor in &attractors {
        let entry = attractor[0];
        let candidates: Vec<State> = entry
            .hamming_neighbors()
            .filter(|it| backbone.contains(it))
            .collect();
        if let Some(exit) = candidates.choose(rng) {
            successors.entry(*exit).or_default().push(entry);
        }
    }

    for source in &parentless {
        let candidates: Vec<State> = source
            .hamming_neighbors()
            .filter(|it| backbone.contains(it))
            .collect();
        let target = candidates
            .choose(rng)
            .copied()
            .unwrap_or_else(|| source.flip(0));
        successors.insert(*source, vec![target]);
    }

    let relation =
        TransitionRelation::from_successor_lists(width, UpdateMode::Asynchronous, successors)?;
    Ok(AttractorPlan {
        relation,
        attractors,
        parentless: parentless.into_iter().collect(),
    })
}
