//! Explicit state transition graphs of Boolean networks.
//!
//! The [`TransitionBuilder`] enumerates the full `2^n` state space of a
//! [`crate::network::BooleanNetwork`] and records the successors of every state under the
//! chosen [`UpdateMode`]. The result is an immutable [`TransitionRelation`].
//!
//! A state whose update does not change anything has an *empty* successor set. The
//! relation never contains self-loops; relations loaded from artifacts that list explicit
//! self-edges are normalized the same way.
//!
//! # Example
//!
//! ```
//! use biodivine_algo_bn_dynamics::network::BooleanNetwork;
//! use biodivine_algo_bn_dynamics::transition::{TransitionBuilder, TransitionConfig, UpdateMode};
//! use biodivine_algo_bn_dynamics::transition::TransitionBuildState;
//! use computation_process::Algorithm;
//!
//! let network = BooleanNetwork::from_expressions([("x1", "x2"), ("x2", "x1")]).unwrap();
//! let config = TransitionConfig::new(network.into(), UpdateMode::Synchronous);
//! let relation = TransitionBuilder::run(config, TransitionBuildState::default()).unwrap();
//! assert_eq!(relation.num_states(), 4);
//! ```

mod builder;
mod relation;

#[cfg(test)]
mod tests;

use crate::network::BooleanNetwork;
use crate::state::State;
pub use builder::{TransitionBuildState, TransitionBuildStep, TransitionConfig, build_relation};
use computation_process::Computation;
pub use relation::TransitionRelation;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Build the complete transition relation of a network.
pub type TransitionBuilder =
    Computation<TransitionConfig, TransitionBuildState, TransitionRelation, TransitionBuildStep>;

/// Update semantics of a Boolean network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// All variables update simultaneously; every state has at most one successor.
    Synchronous,
    /// One variable updates per transition; one successor per disagreeing variable.
    #[default]
    Asynchronous,
}

impl UpdateMode {
    /// Short lowercase name used in file names and reports.
    pub fn short_name(&self) -> &'static str {
        match self {
            UpdateMode::Synchronous => "sync",
            UpdateMode::Asynchronous => "async",
        }
    }

    /// Sorted successors of `state` in `network` under this update mode.
    pub fn successors(&self, network: &BooleanNetwork, state: State) -> Vec<State> {
        match self {
            UpdateMode::Synchronous => {
                let mut next = state;
                for var in 0..network.num_vars() {
                    next = next.set(var, network.next_value(var, state));
                }
                if next == state { Vec::new() } else { vec![next] }
            }
            UpdateMode::Asynchronous => {
                let mut result: Vec<State> = (0..network.num_vars())
                    .filter(|var| network.next_value(*var, state) != state.get(*var))
                    .map(|var| state.flip(var))
                    .collect();
                result.sort_unstable();
                result
            }
        }
    }
}

impl Display for UpdateMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}
