//! Symbolic cross-check of asynchronous attractors.
//!
//! The explicit analysis enumerates all `2^n` states. This module recomputes asynchronous
//! attractors with BDDs (via `biodivine-lib-param-bn`) using the Xie–Beerel scheme, so that
//! the two independent implementations can be compared.
//!
//! ```
//! use biodivine_algo_bn_dynamics::network::BooleanNetwork;
//! use biodivine_algo_bn_dynamics::symbolic::{SymbolicConfig, symbolic_attractors};
//!
//! let network = BooleanNetwork::from_expressions([("x1", "~x2"), ("x2", "~x1")]).unwrap();
//! let config = SymbolicConfig::try_from(&network).unwrap();
//! let attractors = symbolic_attractors(&config).unwrap();
//! assert_eq!(attractors.len(), 2);
//! ```

mod symbolic_config;
mod xie_beerel;


use crate::attractor::AttractorSet;
use crate::state::State;
use biodivine_lib_param_bn::symbolic_async_graph::GraphColoredVertices;
use cancel_this::Cancellable;
use computation_process::{Generator, Stateful};
use log::info;
pub use symbolic_config::{SymbolicConfig, to_symbolic_network};
pub use xie_beerel::{XieBeerelState, XieBeerelStep};

/// Enumerate asynchronous attractors using the Xie–Beerel algorithm.
pub type XieBeerelAttractors =
    Generator<SymbolicConfig, XieBeerelState, GraphColoredVertices, XieBeerelStep>;

/// Compute all asynchronous attractors of the network in `config` as explicit states.
pub fn symbolic_attractors(config: &SymbolicConfig) -> Cancellable<Vec<Vec<State>>> {
    let initial = XieBeerelState::from(&config.graph);
    let mut result = Vec::new();
    for attractor in XieBeerelAttractors::configure(config.clone(), initial) {
        let attractor = attractor?;
        result.push(config.to_states(&attractor));
    }
    info!("Symbolic search found {} attractors.", result.len());
    Ok(result)
}

/// The same as [`symbolic_attractors`], but as an order-independent [`AttractorSet`].
pub fn symbolic_attractor_set(config: &SymbolicConfig) -> Cancellable<AttractorSet> {
    Ok(AttractorSet::from_sets(symbolic_attractors(config)?))
}
