//! Explicit reachability over a [`TransitionRelation`].
//!
//! Reachability is computed as a breadth-first expansion of an initial set of states.
//! Every computation step adds one BFS layer and suspends, so long reachability chains can
//! be interleaved with other work or cancelled between layers.
//!
//! # Type Aliases
//!
//! - [`ForwardReachability`]: states reachable from the initial set.
//! - [`BackwardReachability`]: states that can reach the initial set.
//!
//! # Example
//!
//! ```
//! use biodivine_algo_bn_dynamics::network::BooleanNetwork;
//! use biodivine_algo_bn_dynamics::reachability::{ForwardReachability, ReachabilityConfig};
//! use biodivine_algo_bn_dynamics::state::State;
//! use biodivine_algo_bn_dynamics::transition::{UpdateMode, build_relation};
//! use computation_process::Algorithm;
//! use std::str::FromStr;
//!
//! let network = BooleanNetwork::from_expressions([("x1", "x2"), ("x2", "x2")]).unwrap();
//! let relation = build_relation(&network, UpdateMode::Asynchronous).unwrap();
//! let initial = State::from_str("01").unwrap();
//! let reachable = ForwardReachability::run(ReachabilityConfig::from(relation), initial).unwrap();
//! assert_eq!(reachable.len(), 2);
//! ```

use crate::state::State;
use cancel_this::Cancellable;
use computation_process::{Algorithm, Computation};
use log::info;
use std::collections::BTreeSet;


mod iterative_union;
mod reachability_config;
mod reachability_state;
mod step_operators;

pub use iterative_union::IterativeUnion;
pub use reachability_config::ReachabilityConfig;
pub use reachability_state::ReachabilityState;
pub use step_operators::{BfsPredecessors, BfsSuccessors};

/// A helper alias which allows us to use [`ReachabilityComputation`] as shorthand for
/// `Computation<Context = ReachabilityConfig, State = ReachabilityState>`.
pub type ReachabilityComputation<STEP> =
    Computation<ReachabilityConfig, ReachabilityState, BTreeSet<State>, STEP>;

/// Forward reachability, one BFS layer per step.
pub type ForwardReachability = ReachabilityComputation<IterativeUnion<BfsSuccessors>>;

/// Backward reachability, one BFS layer per step.
pub type BackwardReachability = ReachabilityComputation<IterativeUnion<BfsPredecessors>>;

/// Used to reduce code repetition in reachability-like algorithms.
///
/// Implementors define a single step of a reachability procedure, which is then
/// iterated by higher-level algorithms like [`IterativeUnion`].
pub trait ReachabilityStep {
    /// Perform a single step of reachability computation.
    ///
    /// Returns the newly discovered states (not already in `state.set`), or an empty set
    /// if no more states can be reached.
    fn step(
        context: &ReachabilityConfig,
        state: &ReachabilityState,
    ) -> Cancellable<BTreeSet<State>>;
}

/// Compute the basin of attraction of every attractor.
///
/// A basin contains all states that can reach the attractor, including the attractor
/// itself. Under asynchronous semantics, basins of different attractors can overlap.
pub fn basins(
    config: impl Into<ReachabilityConfig>,
    attractors: &[Vec<State>],
) -> Cancellable<Vec<BTreeSet<State>>> {
    let config = config.into();
    let mut result = Vec::with_capacity(attractors.len());
    for attractor in attractors {
        let initial = ReachabilityState::from(attractor.as_slice());
        let basin = BackwardReachability::run(config.clone(), initial)?;
        result.push(basin);
    }
    info!(
        "Computed {} basins; sizes={:?}.",
        result.len(),
        result.iter().map(|it| it.len()).collect::<Vec<_>>()
    );
    Ok(result)
}
