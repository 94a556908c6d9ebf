//! Strongly connected components of explicit transition relations.
//!
//! [`TarjanScc`] is a generator which yields one SCC at a time. It uses an explicit work
//! stack instead of native recursion, so it works for state spaces of any size that fits
//! in memory. Unlike the symbolic SCC algorithms, *every* SCC is reported, including
//! trivial single-state components, so the reported components partition the state space.
//!
//! The [`CondensationGraph`] collapses every SCC into a single node and is the basis for
//! attractor classification (see [`crate::attractor`]).
//!
//! # Example
//!
//! ```
//! use biodivine_algo_bn_dynamics::network::BooleanNetwork;
//! use biodivine_algo_bn_dynamics::scc::{SccConfig, TarjanScc, TarjanState};
//! use biodivine_algo_bn_dynamics::transition::{UpdateMode, build_relation};
//! use computation_process::Stateful;
//!
//! let network = BooleanNetwork::from_expressions([("x1", "~x2"), ("x2", "x1")]).unwrap();
//! let relation = build_relation(&network, UpdateMode::Asynchronous).unwrap();
//! let config = SccConfig::from(relation);
//! let initial = TarjanState::from(&config);
//! for scc in TarjanScc::configure(config, initial) {
//!     println!("SCC with {} states.", scc.unwrap().len());
//! }
//! ```

mod condensation;
mod scc_config;
mod tarjan;

#[cfg(test)]
mod tests;

use crate::state::State;
use cancel_this::Cancellable;
pub use condensation::CondensationGraph;
use computation_process::{Generator, Stateful};
use log::info;
pub use scc_config::SccConfig;
pub use tarjan::{TarjanState, TarjanStep};

/// Iterative Tarjan's algorithm. Every yielded SCC is sorted. SCCs are yielded in reverse
/// topological order of the condensation graph (an SCC is reported only after every SCC
/// reachable from it).
pub type TarjanScc = Generator<SccConfig, TarjanState, Vec<State>, TarjanStep>;

/// Compute all SCCs of the relation in `config`.
pub fn find_sccs(config: impl Into<SccConfig>) -> Cancellable<Vec<Vec<State>>> {
    let config = config.into();
    let initial = TarjanState::from(&config);
    let mut result = Vec::new();
    for scc in TarjanScc::configure(config, initial) {
        result.push(scc?);
    }
    info!("Found {} SCCs.", result.len());
    Ok(result)
}
