use crate::reachability::{ReachabilityConfig, ReachabilityState, ReachabilityStep};
use crate::state::State;
use crate::{log_states, simple_type_name};
use cancel_this::Cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::debug;
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// A helper implementation of [`ComputationStep`] that repeatedly calls a [`ReachabilityStep`]
/// function, collecting the results into the current `state`.
pub struct IterativeUnion<S: ReachabilityStep>(PhantomData<S>);

impl<S: ReachabilityStep> ComputationStep<ReachabilityConfig, ReachabilityState, BTreeSet<State>>
    for IterativeUnion<S>
{
    fn step(
        context: &ReachabilityConfig,
        state: &mut ReachabilityState,
    ) -> Completable<BTreeSet<State>> {
        if state.iteration >= context.max_iterations {
            debug!(
                "[iteration:{}] Union<{}> canceled (exceeded iteration count).",
                state.iteration,
                simple_type_name::<S>()
            );

            return Err(Cancelled::new("ReachabilityConfig::max_iterations").into());
        } else {
            state.iteration += 1;
        }

        let to_union = S::step(context, state)?;
        if to_union.is_empty() {
            debug!(
                "[iteration:{}] Union<{}> finished with ({}).",
                state.iteration,
                simple_type_name::<S>(),
                log_states(&state.set)
            );

            Ok(state.set.clone())
        } else {
            state.frontier = to_union.iter().copied().collect();
            state.set.extend(to_union);

            debug!(
                "[iteration:{}] Union<{}> increased to ({}).",
                state.iteration,
                simple_type_name::<S>(),
                log_states(&state.set)
            );

            Err(Suspended)
        }
    }
}
