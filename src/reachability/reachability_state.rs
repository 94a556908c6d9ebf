use crate::state::State;
use std::collections::BTreeSet;

/// Intermediate state of a breadth-first reachability computation.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ReachabilityState {
    pub iteration: usize,
    /// All states discovered so far.
    pub set: BTreeSet<State>,
    /// States discovered in the last iteration. Only these need to be expanded.
    pub frontier: Vec<State>,
}

impl From<BTreeSet<State>> for ReachabilityState {
    fn from(value: BTreeSet<State>) -> Self {
        ReachabilityState {
            iteration: 0,
            frontier: value.iter().copied().collect(),
            set: value,
        }
    }
}

impl From<&[State]> for ReachabilityState {
    fn from(value: &[State]) -> Self {
        Self::from(value.iter().copied().collect::<BTreeSet<_>>())
    }
}

impl From<State> for ReachabilityState {
    fn from(value: State) -> Self {
        Self::from(BTreeSet::from([value]))
    }
}

impl From<ReachabilityState> for BTreeSet<State> {
    fn from(value: ReachabilityState) -> Self {
        value.set
    }
}
