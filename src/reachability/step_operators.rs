use crate::log_states;
use crate::reachability::{ReachabilityConfig, ReachabilityState, ReachabilityStep};
use crate::state::State;
use crate::transition::TransitionRelation;
use cancel_this::{Cancellable, is_cancelled};
use log::trace;
use std::collections::BTreeSet;

/// Computes the direct successors of the current frontier, excluding states that are
/// already in the reachable set.
pub struct BfsSuccessors;

/// Computes the direct predecessors of the current frontier, excluding states that are
/// already in the reachable set.
pub struct BfsPredecessors;

fn expand(
    relation: &TransitionRelation,
    state: &ReachabilityState,
) -> Cancellable<BTreeSet<State>> {
    let mut result = BTreeSet::new();
    for (i, source) in state.frontier.iter().enumerate() {
        if i % 4096 == 0 {
            is_cancelled!()?;
        }
        for target in relation.successors(*source) {
            if !state.set.contains(target) {
                result.insert(*target);
            }
        }
    }
    Ok(result)
}

impl ReachabilityStep for BfsSuccessors {
    fn step(
        context: &ReachabilityConfig,
        state: &ReachabilityState,
    ) -> Cancellable<BTreeSet<State>> {
        let post = expand(&context.relation, state)?;
        trace!("Successors of the frontier ({}).", log_states(&post));
        Ok(post)
    }
}

impl ReachabilityStep for BfsPredecessors {
    fn step(
        context: &ReachabilityConfig,
        state: &ReachabilityState,
    ) -> Cancellable<BTreeSet<State>> {
        let pre = expand(&context.reversed, state)?;
        trace!("Predecessors of the frontier ({}).", log_states(&pre));
        Ok(pre)
    }
}
