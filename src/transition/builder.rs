use crate::MAX_EXPLICIT_VARIABLES;
use crate::network::BooleanNetwork;
use crate::state::State;
use crate::transition::{TransitionBuilder, TransitionRelation, UpdateMode};
use cancel_this::{Cancellable, Cancelled, is_cancelled};
use computation_process::Incomplete::Suspended;
use computation_process::{Algorithm, Completable, ComputationStep};
use log::{debug, info};
use std::sync::Arc;

/// Configuration of the [`TransitionBuilder`].
#[derive(Clone, Debug)]
pub struct TransitionConfig {
    pub network: Arc<BooleanNetwork>,
    pub mode: UpdateMode,
    /// Number of states processed by a single computation step (default: `4096`).
    pub chunk_size: usize,
}

impl TransitionConfig {
    pub fn new(network: Arc<BooleanNetwork>, mode: UpdateMode) -> TransitionConfig {
        TransitionConfig {
            network,
            mode,
            chunk_size: 4096,
        }
    }
}

impl From<(&BooleanNetwork, UpdateMode)> for TransitionConfig {
    fn from(value: (&BooleanNetwork, UpdateMode)) -> Self {
        TransitionConfig::new(Arc::new(value.0.clone()), value.1)
    }
}

/// Partial progress of the [`TransitionBuilder`].
#[derive(Clone, Debug, Default)]
pub struct TransitionBuildState {
    next: u64,
    successors: Vec<Vec<State>>,
}

/// A [`ComputationStep`] which evaluates one chunk of the state space.
pub struct TransitionBuildStep;

impl ComputationStep<TransitionConfig, TransitionBuildState, TransitionRelation>
    for TransitionBuildStep
{
    fn step(
        context: &TransitionConfig,
        state: &mut TransitionBuildState,
    ) -> Completable<TransitionRelation> {
        let width = context.network.num_vars();
        if width > MAX_EXPLICIT_VARIABLES {
            debug!(
                "Transition build canceled ({width} variables exceed the explicit limit of {MAX_EXPLICIT_VARIABLES})."
            );
            return Err(Cancelled::new("MAX_EXPLICIT_VARIABLES").into());
        }

        is_cancelled!()?;

        let total = 1u64 << width;
        if state.next == 0 {
            state.successors.reserve(total as usize);
        }

        let end = total.min(state.next + context.chunk_size.max(1) as u64);
        for bits in state.next..end {
            let current = State::from_bits(bits, width);
            state
                .successors
                .push(context.mode.successors(&context.network, current));
        }
        state.next = end;

        if end < total {
            debug!(
                "[{}] Transition build processed {end}/{total} states.",
                context.mode
            );
            return Err(Suspended);
        }

        let successors = std::mem::take(&mut state.successors);
        let relation = TransitionRelation::from_parts(width, context.mode, successors);
        info!(
            "[{}] Transition relation built: states={}; edges={}.",
            context.mode,
            relation.num_states(),
            relation.num_edges()
        );
        Ok(relation)
    }
}

/// Build the full transition relation of `network` under `mode`.
pub fn build_relation(
    network: &BooleanNetwork,
    mode: UpdateMode,
) -> Cancellable<TransitionRelation> {
    TransitionBuilder::run((network, mode), TransitionBuildState::default())
}
