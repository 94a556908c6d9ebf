use crate::state::State;

#[cfg(test)]
mod test_utils;

pub mod attractor;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod expression;
pub mod generator;
pub mod learned;
pub mod learner;
pub mod network;
pub mod pipeline;
pub mod reachability;
pub mod reconstruct;
pub mod sampler;
pub mod scc;
pub mod state;
pub mod symbolic;
pub mod transition;

/// The largest network for which the full state space is enumerated explicitly.
pub const MAX_EXPLICIT_VARIABLES: usize = 24;

/// A utility method for printing useful metadata of explicit state sets.
fn log_states<'a, I: IntoIterator<Item = &'a State>>(states: I) -> String {
    let mut count = 0usize;
    let mut first = None;
    for state in states {
        if first.is_none() {
            first = Some(*state);
        }
        count += 1;
    }
    match first {
        Some(first) => format!("elements={count}; first={first}"),
        None => "elements=0".to_string(),
    }
}

/// Extract the "simple name" of a type argument at compile time.
///
/// In the future, this should be a `const fn`, but `type_name` and `unwrap_or` are not
/// yet stabilized as `const` functions (even thought they probably are).
fn simple_type_name<T>() -> &'static str {
    std::any::type_name::<T>().split("::").last().unwrap_or("?")
}
