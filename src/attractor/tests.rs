//! See `test_utils/example_networks.rs` for the documentation of the test networks.

use crate::attractor::{AttractorSet, analyze, classify};
use crate::network::NetworkDefinition;
use crate::scc::find_sccs;
use crate::state::State;
use crate::test_utils::example_networks::{chain_network, rotation_network, toggle_network};
use crate::test_utils::{expected_sets, init_logger, mk_state, mk_states, normalize_sets};
use crate::transition::{TransitionRelation, UpdateMode, build_relation};
use cancel_this::Cancellable;
use std::collections::BTreeMap;

fn attractors_of(relation: TransitionRelation) -> Cancellable<Vec<Vec<State>>> {
    Ok(analyze(relation)?.attractors().cloned().collect())
}

fn test_rotation_sync_impl() -> Cancellable<()> {
    init_logger();
    let relation = build_relation(&rotation_network(), UpdateMode::Synchronous)?;
    let classification = analyze(relation)?;
    let attractors: Vec<_> = classification.attractors().cloned().collect();
    // Under rotation, every state lies on a cycle, so every SCC is terminal.
    assert_eq!(
        normalize_sets(&attractors),
        expected_sets(&[
            &["001", "010", "100"],
            &["011", "101", "110"],
            &["000"],
            &["111"],
        ])
    );
    assert_eq!(classification.transients().count(), 0);
    assert_eq!(classification.fixed_points(), mk_states(&["000", "111"]));
    Ok(())
}

fn test_rotation_async_impl() -> Cancellable<()> {
    init_logger();
    let relation = build_relation(&rotation_network(), UpdateMode::Asynchronous)?;
    let attractors = attractors_of(relation)?;
    assert_eq!(normalize_sets(&attractors), expected_sets(&[&["000"], &["111"]]));
    Ok(())
}

fn test_toggle_impl() -> Cancellable<()> {
    init_logger();
    let async_relation = build_relation(&toggle_network(), UpdateMode::Asynchronous)?;
    let sync_relation = build_relation(&toggle_network(), UpdateMode::Synchronous)?;
    assert_eq!(
        normalize_sets(&attractors_of(async_relation)?),
        expected_sets(&[&["01"], &["10"]])
    );
    assert_eq!(
        normalize_sets(&attractors_of(sync_relation)?),
        expected_sets(&[&["00", "11"], &["01"], &["10"]])
    );
    Ok(())
}

fn test_chain_modes_agree_impl() -> Cancellable<()> {
    init_logger();
    let network = chain_network();
    let sync = analyze(build_relation(&network, UpdateMode::Synchronous)?)?;
    let asynchronous = analyze(build_relation(&network, UpdateMode::Asynchronous)?)?;
    assert_eq!(sync.attractor_set(), asynchronous.attractor_set());
    assert_eq!(sync.fixed_points(), mk_states(&["0000", "0001", "1101"]));
    Ok(())
}

#[test]
fn test_rotation_sync() -> Cancellable<()> {
    test_rotation_sync_impl()
}

#[test]
fn test_rotation_async() -> Cancellable<()> {
    test_rotation_async_impl()
}

#[test]
fn test_toggle() -> Cancellable<()> {
    test_toggle_impl()
}

#[test]
fn test_chain_modes_agree() -> Cancellable<()> {
    test_chain_modes_agree_impl()
}

#[test]
fn test_scc_info() {
    init_logger();
    let relation = build_relation(&toggle_network(), UpdateMode::Asynchronous).unwrap();
    let sccs = find_sccs(relation.clone()).unwrap();
    let classification = classify(sccs, &relation);
    let info = classification.scc_info();
    assert_eq!(info.len(), 4);
    assert_eq!(info.iter().filter(|it| it.is_fixed_point).count(), 2);
    assert!(info.iter().all(|it| it.size == 1));
    let transient_degrees: Vec<usize> = info
        .iter()
        .filter(|it| !it.is_attractor)
        .map(|it| it.out_degree)
        .collect();
    // `11` reaches `01` and `10`; `00` reaches the same two fixed points.
    assert_eq!(transient_degrees, vec![2, 2]);
}

#[test]
fn test_attractor_set_ignores_order() {
    let a = AttractorSet::from_sets([mk_states(&["01", "10"]), mk_states(&["11"])]);
    let b = AttractorSet::from_sets([
        vec![mk_state("11")],
        mk_states(&["10", "01"]),
    ]);
    let c = AttractorSet::from_sets([mk_states(&["01"]), mk_states(&["11"])]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.matches(&c), 1);
    assert_eq!(a.sizes(), vec![2, 1]);
}

#[test]
fn test_listed_self_loop_is_fixed_point() {
    init_logger();
    let mut listing = BTreeMap::new();
    listing.insert("00".to_string(), vec!["00".to_string()]);
    listing.insert("01".to_string(), vec!["00".to_string()]);
    listing.insert("10".to_string(), vec!["11".to_string()]);
    listing.insert("11".to_string(), vec!["10".to_string()]);
    let definition = NetworkDefinition {
        transitions: listing,
        ..Default::default()
    };
    let relation = definition.relation().unwrap().unwrap();
    let classification = analyze(relation).unwrap();
    assert_eq!(
        normalize_sets(&classification.attractors().cloned().collect::<Vec<_>>()),
        expected_sets(&[&["00"], &["10", "11"]])
    );
    assert_eq!(classification.fixed_points(), mk_states(&["00"]));
}
