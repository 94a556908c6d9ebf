use crate::state::State;
use crate::transition::TransitionRelation;
use std::collections::BTreeSet;

/// The graph of SCCs: component `a` has an edge to component `b != a` iff some state of
/// `a` has a successor in `b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CondensationGraph {
    component_of: Vec<usize>,
    successors: Vec<BTreeSet<usize>>,
}

const NO_COMPONENT: usize = usize::MAX;

impl CondensationGraph {
    /// Build the condensation of `relation` with respect to the given components.
    ///
    /// Components are identified by their position in `sccs`. States not covered by any
    /// component are ignored, together with all edges that touch them.
    pub fn new(relation: &TransitionRelation, sccs: &[Vec<State>]) -> CondensationGraph {
        let mut component_of = vec![NO_COMPONENT; relation.num_states()];
        for (id, scc) in sccs.iter().enumerate() {
            for state in scc {
                component_of[state.index()] = id;
            }
        }

        let mut successors = vec![BTreeSet::new(); sccs.len()];
        for (id, scc) in sccs.iter().enumerate() {
            for state in scc {
                for target in relation.successors(*state) {
                    let target_id = component_of[target.index()];
                    if target_id != id && target_id != NO_COMPONENT {
                        successors[id].insert(target_id);
                    }
                }
            }
        }

        CondensationGraph {
            component_of,
            successors,
        }
    }

    pub fn num_components(&self) -> usize {
        self.successors.len()
    }

    pub fn component_of(&self, state: State) -> Option<usize> {
        match self.component_of.get(state.index()) {
            Some(id) if *id != NO_COMPONENT => Some(*id),
            _ => None,
        }
    }

    /// Components directly reachable from `component` (never includes `component` itself).
    pub fn successors(&self, component: usize) -> &BTreeSet<usize> {
        &self.successors[component]
    }

    pub fn out_degree(&self, component: usize) -> usize {
        self.successors[component].len()
    }

    /// A component is terminal if it has no outgoing edge.
    pub fn is_terminal(&self, component: usize) -> bool {
        self.successors[component].is_empty()
    }

    pub fn terminal_components(&self) -> Vec<usize> {
        (0..self.num_components())
            .filter(|it| self.is_terminal(*it))
            .collect()
    }

    /// All `(source, target)` component edges.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(source, targets)| targets.iter().map(move |target| (source, *target)))
            .collect()
    }
}
