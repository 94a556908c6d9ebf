pub mod example_networks;

use crate::state::State;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Creates a state from its canonical string.
///
/// # Panics
///
/// Panics if the string is not a valid state (tests only).
pub fn mk_state(state: &str) -> State {
    State::from_str(state).unwrap()
}

/// Creates a sorted list of states from canonical strings.
///
/// # Example
///
/// `mk_states(&["000", "101"])` creates `[000, 101]`.
pub fn mk_states(states: &[&str]) -> Vec<State> {
    let mut result: Vec<State> = states.iter().map(|it| mk_state(it)).collect();
    result.sort();
    result
}

/// Convert a list of state sets into canonical strings, normalized so that the order of
/// sets and of states inside them does not matter.
pub fn normalize_sets(sets: &[Vec<State>]) -> BTreeSet<BTreeSet<String>> {
    sets.iter()
        .map(|set| set.iter().map(|it| it.to_string()).collect())
        .collect()
}

/// The same as [`normalize_sets`], but for string literals.
pub fn expected_sets(sets: &[&[&str]]) -> BTreeSet<BTreeSet<String>> {
    sets.iter()
        .map(|set| set.iter().map(|it| it.to_string()).collect())
        .collect()
}
