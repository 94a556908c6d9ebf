//! Tests for the iterative Tarjan's algorithm and the condensation graph.
//!
//! See `test_utils/example_networks.rs` for the documentation of the test networks.

use crate::network::NetworkDefinition;
use crate::scc::{CondensationGraph, SccConfig, TarjanScc, TarjanState, find_sccs};
use crate::state::State;
use crate::test_utils::example_networks::{rotation_network, toggle_network};
use crate::test_utils::{expected_sets, init_logger, mk_state, normalize_sets};
use crate::transition::{TransitionRelation, UpdateMode, build_relation};
use cancel_this::Cancellable;
use computation_process::Stateful;
use std::collections::HashSet;
use std::sync::Arc;

// ========== Helper functions ==========

/// Check that the components are disjoint and cover the whole state space.
fn assert_partition(relation: &TransitionRelation, sccs: &[Vec<State>]) {
    let mut seen = HashSet::new();
    for scc in sccs {
        assert!(!scc.is_empty());
        for state in scc {
            assert!(seen.insert(*state), "{state} appears in two SCCs");
        }
    }
    assert_eq!(seen.len(), relation.num_states());
}

/// A relation over `width` variables where every state `i` has the single successor `i+1`.
fn long_path(width: usize) -> TransitionRelation {
    let count = 1u64 << width;
    let entries = (0..count - 1).map(|i| {
        (
            State::from_bits(i, width),
            vec![State::from_bits(i + 1, width)],
        )
    });
    TransitionRelation::from_successor_lists(width, UpdateMode::Asynchronous, entries).unwrap()
}

fn test_rotation_sync_components_impl() -> Cancellable<()> {
    init_logger();
    let relation = build_relation(&rotation_network(), UpdateMode::Synchronous)?;
    let sccs = find_sccs(relation.clone())?;
    assert_partition(&relation, &sccs);
    assert_eq!(
        normalize_sets(&sccs),
        expected_sets(&[
            &["000"],
            &["111"],
            &["001", "010", "100"],
            &["011", "101", "110"],
        ])
    );
    Ok(())
}

fn test_rotation_async_components_impl() -> Cancellable<()> {
    init_logger();
    let relation = build_relation(&rotation_network(), UpdateMode::Asynchronous)?;
    let sccs = find_sccs(relation.clone())?;
    assert_partition(&relation, &sccs);

    let condensation = CondensationGraph::new(&relation, &sccs);
    let terminal: Vec<Vec<State>> = condensation
        .terminal_components()
        .into_iter()
        .map(|id| sccs[id].clone())
        .collect();
    assert_eq!(normalize_sets(&terminal), expected_sets(&[&["000"], &["111"]]));
    Ok(())
}

fn test_deep_path_does_not_recurse_impl() -> Cancellable<()> {
    init_logger();
    let relation = Arc::new(long_path(16));
    let mut config = SccConfig::from(&relation);
    config.step_budget = 7;
    let initial = TarjanState::from(&config);

    let mut sccs = Vec::new();
    for scc in TarjanScc::configure(config, initial) {
        sccs.push(scc?);
    }

    assert_eq!(sccs.len(), 1 << 16);
    assert_partition(&relation, &sccs);
    // Reverse topological order: the end of the path is reported first.
    assert_eq!(sccs[0], vec![State::from_bits((1 << 16) - 1, 16)]);
    assert_eq!(sccs[sccs.len() - 1], vec![State::from_bits(0, 16)]);
    Ok(())
}

// ========== Tests ==========

#[test]
fn test_rotation_sync_components() -> Cancellable<()> {
    test_rotation_sync_components_impl()
}

#[test]
fn test_rotation_async_components() -> Cancellable<()> {
    test_rotation_async_components_impl()
}

#[test]
fn test_deep_path_does_not_recurse() -> Cancellable<()> {
    test_deep_path_does_not_recurse_impl()
}

#[test]
fn test_condensation_excludes_self() {
    init_logger();
    let relation = build_relation(&toggle_network(), UpdateMode::Asynchronous).unwrap();
    let sccs = find_sccs(relation.clone()).unwrap();
    assert_eq!(sccs.len(), 4);

    let condensation = CondensationGraph::new(&relation, &sccs);
    let c00 = condensation.component_of(mk_state("00")).unwrap();
    let c01 = condensation.component_of(mk_state("01")).unwrap();
    let c10 = condensation.component_of(mk_state("10")).unwrap();
    assert_eq!(
        condensation.successors(c00).iter().copied().collect::<Vec<_>>(),
        {
            let mut v = vec![c01, c10];
            v.sort();
            v
        }
    );
    assert!(condensation.is_terminal(c01));
    assert!(condensation.is_terminal(c10));
    assert_eq!(condensation.edges().len(), 4);
    for id in 0..condensation.num_components() {
        assert!(!condensation.successors(id).contains(&id));
    }
}

#[test]
fn test_strongly_connected_listing() {
    init_logger();
    let json =
        std::fs::read_to_string("resources/networks/4d_cycle_alternative_path.json").unwrap();
    let relation = NetworkDefinition::from_json(&json)
        .unwrap()
        .relation()
        .unwrap()
        .unwrap();
    let sccs = find_sccs(relation).unwrap();
    assert_eq!(sccs.len(), 1);
    assert_eq!(sccs[0].len(), 16);
}
