use crate::network::BooleanNetwork;
use crate::reconstruct::{
    Implicant, ObservedFunctions, format_sop, minimize, prime_implicants, reconstruct_network,
    simplify, sop_expression,
};
use crate::test_utils::example_networks::{chain_network, rotation_network, toggle_network};
use crate::test_utils::init_logger;
use crate::transition::{TransitionRelation, UpdateMode, build_relation};
use cancel_this::Cancellable;
use std::collections::BTreeSet;
use test_generator::test_resources;

fn names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("x{i}")).collect()
}

fn test_round_trip_impl(network: &BooleanNetwork) -> Cancellable<()> {
    init_logger();
    for mode in [UpdateMode::Synchronous, UpdateMode::Asynchronous] {
        let relation = build_relation(network, mode)?;
        let rebuilt = reconstruct_network(&relation, network.variables()).unwrap();
        assert_eq!(build_relation(&rebuilt, mode)?, relation, "round trip in {mode}");
    }
    Ok(())
}

#[test]
fn test_round_trip_examples() -> Cancellable<()> {
    test_round_trip_impl(&rotation_network())?;
    test_round_trip_impl(&toggle_network())?;
    test_round_trip_impl(&chain_network())
}

#[test_resources("resources/networks/*d_net_*.json")]
fn test_round_trip_resources(path: &str) {
    let json = std::fs::read_to_string(path).unwrap();
    let definition = crate::network::NetworkDefinition::from_json(&json).unwrap();
    if let Some(network) = definition.network().unwrap() {
        test_round_trip_impl(&network).unwrap();
    }
}

#[test]
fn test_single_negative_literal() {
    // Minterms `00` and `01` over (x1, x2).
    assert_eq!(sop_expression(&[0, 1], &names(2)), "~x1");
}

#[test]
fn test_known_minimizations() {
    assert_eq!(sop_expression(&[1, 3, 5, 7], &names(3)), "x3");
    assert_eq!(
        sop_expression(&[0, 7], &names(3)),
        "(x1 & x2 & x3) | (~x1 & ~x2 & ~x3)"
    );
    assert_eq!(
        sop_expression(&[3, 5, 6, 7], &names(3)),
        "(x1 & x2) | (x1 & x3) | (x2 & x3)"
    );
    assert_eq!(sop_expression(&[1, 2], &names(2)), "(x1 & ~x2) | (~x1 & x2)");
    assert_eq!(sop_expression(&[], &names(3)), "0");
    assert_eq!(sop_expression(&[0, 1, 2, 3], &names(2)), "1");
    assert_eq!(sop_expression(&[0], &[]), "1");
}

#[test]
fn test_sixty_four_variables() {
    let names = names(64);
    let expression = sop_expression(&[1, 3], &names);
    assert!(expression.starts_with("(~x1 & ~x2 & "), "{expression}");
    assert!(expression.ends_with(" & ~x62 & x64)"), "{expression}");
    assert_eq!(expression.matches('&').count(), 62);
}

#[test]
fn test_prime_implicants_and_cover() {
    // f = ~x1 | x3 over three variables.
    let minterms = [0, 1, 2, 3, 5, 7];
    let primes: BTreeSet<Implicant> = prime_implicants(&minterms).into_iter().collect();
    let expected = BTreeSet::from([
        Implicant { value: 0b000, mask: 0b011 },
        Implicant { value: 0b001, mask: 0b110 },
    ]);
    assert_eq!(primes, expected);
    let cover = minimize(&minterms, 3);
    assert_eq!(cover.len(), 2);
    for minterm in minterms {
        assert!(cover.iter().any(|it| it.covers(minterm)));
    }
    assert_eq!(format_sop(&cover, &names(3)), "x3 | ~x1");
}

#[test]
fn test_chain_dependencies_and_expressions() {
    init_logger();
    let relation = build_relation(&chain_network(), UpdateMode::Asynchronous).unwrap();
    let functions = ObservedFunctions::from_relation(&relation);
    let expected = BTreeSet::from([(0, 0), (0, 1), (1, 2), (3, 2), (2, 3), (3, 3)]);
    assert_eq!(functions.regulations(), expected);

    let expressions = functions.expressions(&names(4)).unwrap();
    assert_eq!(expressions["x1"], "x1");
    assert_eq!(expressions["x2"], "x1");
    assert_eq!(expressions["x3"], "(x2 & ~x4)");
    assert_eq!(expressions["x4"], "x3 | x4");
    assert!(functions.expressions(&names(3)).is_err());
}

#[test]
fn test_identity_fallback() {
    init_logger();
    let relation =
        TransitionRelation::from_successor_lists(2, UpdateMode::Asynchronous, []).unwrap();
    let functions = ObservedFunctions::from_relation(&relation);
    let expressions = functions.expressions(&names(2)).unwrap();
    assert_eq!(expressions["x1"], "x1");
    assert_eq!(expressions["x2"], "x2");
}

#[test]
fn test_sync_next_state() {
    init_logger();
    let relation = build_relation(&rotation_network(), UpdateMode::Synchronous).unwrap();
    let functions = ObservedFunctions::from_relation(&relation);
    for state in relation.states() {
        assert_eq!(functions.next_state(state), relation.sync_step(state));
    }
}

#[test]
fn test_simplify_redundant_rules() {
    init_logger();
    let network = BooleanNetwork::from_expressions([
        ("x1", "x1 | (x1 & x2)"),
        ("x2", "(x1 & x2) | (x1 & ~x2)"),
    ])
    .unwrap();
    let simplified = simplify(&network).unwrap();
    assert_eq!(simplified["x1"], "x1");
    assert_eq!(simplified["x2"], "x1");
}
