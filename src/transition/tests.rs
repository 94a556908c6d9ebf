//! Tests for the transition graph builder.
//!
//! See `test_utils/example_networks.rs` for the documentation of the test networks.

use crate::network::BooleanNetwork;
use crate::state::State;
use crate::test_utils::example_networks::{rotation_network, toggle_network};
use crate::test_utils::{init_logger, mk_state, mk_states};
use crate::transition::{
    TransitionBuildState, TransitionBuilder, TransitionConfig, TransitionRelation, UpdateMode,
    build_relation,
};
use cancel_this::Cancellable;
use computation_process::{Algorithm, Computable, Stateful};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

// ========== Helper functions ==========

fn successor_strings(relation: &TransitionRelation, state: &str) -> Vec<String> {
    relation
        .successors(mk_state(state))
        .iter()
        .map(|it| it.to_string())
        .collect()
}

fn test_rotation_sync_successors_impl() -> Cancellable<()> {
    init_logger();
    let relation = build_relation(&rotation_network(), UpdateMode::Synchronous)?;

    assert_eq!(relation.num_states(), 8);
    assert_eq!(successor_strings(&relation, "100"), vec!["001"]);
    assert_eq!(successor_strings(&relation, "001"), vec!["010"]);
    assert_eq!(successor_strings(&relation, "010"), vec!["100"]);
    assert_eq!(successor_strings(&relation, "110"), vec!["101"]);
    assert!(relation.is_fixed_point(mk_state("000")));
    assert!(relation.is_fixed_point(mk_state("111")));
    Ok(())
}

fn test_async_successors_are_hamming_neighbors_impl() -> Cancellable<()> {
    init_logger();
    for network in [rotation_network(), toggle_network()] {
        let relation = build_relation(&network, UpdateMode::Asynchronous)?;
        for (state, successors) in relation.iter() {
            for successor in successors {
                assert_eq!(state.hamming_distance(successor), 1);
            }
            // The successors are exactly the flips of disagreeing variables.
            let expected: Vec<State> = (0..network.num_vars())
                .filter(|var| network.next_value(*var, state) != state.get(*var))
                .map(|var| state.flip(var))
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            assert_eq!(successors, expected.as_slice());
        }
    }
    Ok(())
}

fn test_agreeing_state_has_no_async_successors_impl() -> Cancellable<()> {
    init_logger();
    let relation = build_relation(&toggle_network(), UpdateMode::Asynchronous)?;
    assert!(relation.successors(mk_state("01")).is_empty());
    assert!(relation.successors(mk_state("10")).is_empty());
    assert_eq!(successor_strings(&relation, "00"), vec!["01", "10"]);
    assert_eq!(successor_strings(&relation, "11"), vec!["01", "10"]);
    Ok(())
}

fn test_sync_iteration_repeats_impl() -> Cancellable<()> {
    init_logger();
    let network = BooleanNetwork::from_expressions([
        ("x1", "x2 | x4"),
        ("x2", "~x1 & x3"),
        ("x3", "~x3"),
        ("x4", "x1 & ~x2"),
    ])
    .unwrap();
    let relation = build_relation(&network, UpdateMode::Synchronous)?;
    let bound = 1usize << network.num_vars();
    for start in relation.states() {
        let mut seen = HashSet::new();
        let mut current = start;
        let mut steps = 0;
        while seen.insert(current) {
            current = relation.sync_step(current);
            steps += 1;
            assert!(steps <= bound, "no repeat from {start} within {bound} steps");
        }
    }
    Ok(())
}

fn test_chunked_build_matches_single_chunk_impl() -> Cancellable<()> {
    init_logger();
    let network = Arc::new(rotation_network());
    let whole = TransitionBuilder::run(
        TransitionConfig::new(network.clone(), UpdateMode::Asynchronous),
        TransitionBuildState::default(),
    )?;

    let mut config = TransitionConfig::new(network, UpdateMode::Asynchronous);
    config.chunk_size = 3;
    let mut chunked = TransitionBuilder::configure(config, TransitionBuildState::default());
    let relation = chunked.compute()?;
    assert_eq!(relation, whole);
    Ok(())
}

// ========== Tests ==========

#[test]
fn test_rotation_sync_successors() -> Cancellable<()> {
    test_rotation_sync_successors_impl()
}

#[test]
fn test_async_successors_are_hamming_neighbors() -> Cancellable<()> {
    test_async_successors_are_hamming_neighbors_impl()
}

#[test]
fn test_agreeing_state_has_no_async_successors() -> Cancellable<()> {
    test_agreeing_state_has_no_async_successors_impl()
}

#[test]
fn test_sync_iteration_repeats() -> Cancellable<()> {
    test_sync_iteration_repeats_impl()
}

#[test]
fn test_chunked_build_matches_single_chunk() -> Cancellable<()> {
    test_chunked_build_matches_single_chunk_impl()
}

#[test]
fn test_missing_rule_keeps_value() {
    init_logger();
    let mut network =
        BooleanNetwork::new(vec!["a".to_string(), "b".to_string(), "c".to_string()]).unwrap();
    network.set_expression("a", "~a").unwrap();
    let relation = build_relation(&network, UpdateMode::Synchronous).unwrap();
    for (state, successors) in relation.iter() {
        assert_eq!(successors, &[state.flip(0)]);
    }
    let relation = build_relation(&network, UpdateMode::Asynchronous).unwrap();
    assert_eq!(relation.num_edges(), 8);
}

#[test]
fn test_oversized_network_is_cancelled() {
    init_logger();
    let variables: Vec<String> = (1..=30).map(|i| format!("x{i}")).collect();
    let network = BooleanNetwork::new(variables).unwrap();
    assert!(build_relation(&network, UpdateMode::Asynchronous).is_err());
}

#[test]
fn test_listed_relation_is_normalized() {
    let mut listing = BTreeMap::new();
    listing.insert("00".to_string(), vec!["00".to_string()]);
    listing.insert(
        "01".to_string(),
        vec!["11".to_string(), "00".to_string(), "11".to_string()],
    );
    let relation =
        TransitionRelation::from_string_lists(UpdateMode::Asynchronous, &listing).unwrap();
    assert_eq!(relation.num_states(), 4);
    assert!(relation.is_fixed_point(mk_state("00")));
    assert_eq!(relation.successors(mk_state("01")), mk_states(&["00", "11"]).as_slice());
    assert!(relation.is_fixed_point(mk_state("10")));

    let reversed = relation.reversed();
    assert_eq!(reversed.successors(mk_state("00")), mk_states(&["01"]).as_slice());
    assert_eq!(relation.in_degrees(), vec![1, 0, 0, 1]);
}

#[test]
fn test_listed_relation_rejects_mixed_widths() {
    let mut listing = BTreeMap::new();
    listing.insert("00".to_string(), vec!["001".to_string()]);
    assert!(TransitionRelation::from_string_lists(UpdateMode::Asynchronous, &listing).is_err());
}
