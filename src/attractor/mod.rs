//! Attractor identification on top of the explicit SCC decomposition.
//!
//! An attractor is an SCC with no outgoing edge in the condensation graph. All other SCCs
//! are transient. [`classify`] splits an SCC decomposition accordingly and keeps the
//! condensation graph around for collaborators that need the full component structure.
//!
//! ```
//! use biodivine_algo_bn_dynamics::attractor::analyze;
//! use biodivine_algo_bn_dynamics::network::BooleanNetwork;
//! use biodivine_algo_bn_dynamics::transition::{UpdateMode, build_relation};
//!
//! let network = BooleanNetwork::from_expressions([("x1", "~x2"), ("x2", "~x1")]).unwrap();
//! let relation = build_relation(&network, UpdateMode::Asynchronous).unwrap();
//! let classification = analyze(relation).unwrap();
//! assert_eq!(classification.attractors().count(), 2);
//! ```

mod attractor_set;

#[cfg(test)]
mod tests;

pub use attractor_set::AttractorSet;

use crate::scc::{CondensationGraph, SccConfig, find_sccs};
use crate::state::State;
use crate::transition::TransitionRelation;
use cancel_this::Cancellable;
use log::info;
use serde::Serialize;

/// Summary of a single SCC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SccInfo {
    pub size: usize,
    /// Number of distinct SCCs directly reachable from this one.
    pub out_degree: usize,
    pub is_attractor: bool,
    /// A singleton attractor.
    pub is_fixed_point: bool,
}

/// An SCC decomposition split into attractors and transient components.
#[derive(Clone, Debug)]
pub struct Classification {
    sccs: Vec<Vec<State>>,
    condensation: CondensationGraph,
    attractor_ids: Vec<usize>,
}

/// Classify the SCCs of `relation`.
///
/// The components must partition the state space of `relation` (as produced by
/// [`find_sccs`]). An SCC is an attractor iff no member has a successor outside of it.
pub fn classify(sccs: Vec<Vec<State>>, relation: &TransitionRelation) -> Classification {
    let condensation = CondensationGraph::new(relation, &sccs);
    let attractor_ids = condensation.terminal_components();
    info!(
        "Classified {} SCCs: {} attractors, {} transient.",
        sccs.len(),
        attractor_ids.len(),
        sccs.len() - attractor_ids.len()
    );
    Classification {
        sccs,
        condensation,
        attractor_ids,
    }
}

/// Compute and classify all SCCs of a relation.
pub fn analyze(config: impl Into<SccConfig>) -> Cancellable<Classification> {
    let config = config.into();
    let relation = config.relation.clone();
    let sccs = find_sccs(config)?;
    Ok(classify(sccs, relation.as_ref()))
}

impl Classification {
    /// All SCCs, indexed the same way as the condensation graph.
    pub fn sccs(&self) -> &[Vec<State>] {
        &self.sccs
    }

    pub fn condensation(&self) -> &CondensationGraph {
        &self.condensation
    }

    pub fn attractors(&self) -> impl Iterator<Item = &Vec<State>> + '_ {
        self.attractor_ids.iter().map(|id| &self.sccs[*id])
    }

    pub fn transients(&self) -> impl Iterator<Item = &Vec<State>> + '_ {
        (0..self.sccs.len())
            .filter(|id| !self.condensation.is_terminal(*id))
            .map(|id| &self.sccs[id])
    }

    pub fn num_attractors(&self) -> usize {
        self.attractor_ids.len()
    }

    /// Attractors as an order-independent set.
    pub fn attractor_set(&self) -> AttractorSet {
        AttractorSet::from_sets(self.attractors().cloned())
    }

    /// All attractor states, sorted.
    pub fn attractor_states(&self) -> Vec<State> {
        let mut result: Vec<State> = self.attractors().flatten().copied().collect();
        result.sort_unstable();
        result
    }

    pub fn info(&self, scc: usize) -> SccInfo {
        let is_attractor = self.condensation.is_terminal(scc);
        SccInfo {
            size: self.sccs[scc].len(),
            out_degree: self.condensation.out_degree(scc),
            is_attractor,
            is_fixed_point: is_attractor && self.sccs[scc].len() == 1,
        }
    }

    pub fn scc_info(&self) -> Vec<SccInfo> {
        (0..self.sccs.len()).map(|id| self.info(id)).collect()
    }

    /// The singleton attractors.
    pub fn fixed_points(&self) -> Vec<State> {
        let mut result: Vec<State> = self
            .attractors()
            .filter(|it| it.len() == 1)
            .map(|it| it[0])
            .collect();
        result.sort_unstable();
        result
    }
}
