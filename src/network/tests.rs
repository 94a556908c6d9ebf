//! Tests for network construction and the JSON network definition.

use crate::error::FormatError;
use crate::network::{BooleanNetwork, NetworkDefinition, TruthTable, natural_cmp};
use crate::test_utils::example_networks::toggle_network;
use crate::test_utils::{init_logger, mk_state};
use crate::transition::{UpdateMode, build_relation};
use std::cmp::Ordering;
use test_generator::test_resources;

// ========== Helper functions ==========

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|it| it.to_string()).collect()
}

// ========== Network construction ==========

#[test]
fn variables_are_ordered_naturally() {
    assert_eq!(natural_cmp("x2", "x10"), Ordering::Less);
    assert_eq!(natural_cmp("x10", "x9"), Ordering::Greater);
    assert_eq!(natural_cmp("a", "b"), Ordering::Less);

    let network = BooleanNetwork::from_expressions([
        ("x10", "x1"),
        ("x2", "x10"),
        ("x1", "x2"),
    ])
    .unwrap();
    assert_eq!(network.variables(), &names(&["x1", "x2", "x10"]));
}

#[test]
fn invalid_variable_sets_are_rejected() {
    assert!(BooleanNetwork::new(vec![]).is_err());
    assert!(BooleanNetwork::new(names(&["a", "a"])).is_err());
    assert!(BooleanNetwork::new(names(&["1x"])).is_err());
    assert!(BooleanNetwork::new(names(&["true"])).is_err());
}

#[test]
fn expressions_may_only_use_declared_variables() {
    let result = BooleanNetwork::from_expressions([("x1", "x2"), ("x2", "x3")]);
    assert_eq!(result, Err(FormatError::UnknownVariable("x3".to_string())));
}

#[test]
fn partial_table_keeps_value_for_undefined_rows() {
    let mut network = BooleanNetwork::new(names(&["a", "b"])).unwrap();
    let mut table = TruthTable::new(vec![1]).unwrap();
    table.set_row_bits("1", true).unwrap();
    network.set_table("a", table).unwrap();

    // b = 1 => a becomes 1; b = 0 is undefined => a keeps its value.
    assert!(network.next_value(0, mk_state("01")));
    assert!(!network.next_value(0, mk_state("00")));
    assert!(network.next_value(0, mk_state("10")));
    // No rule for `b`.
    assert!(network.next_value(1, mk_state("01")));
    assert_eq!(network.regulations().into_iter().collect::<Vec<_>>(), vec![(1, 0)]);
}

#[test]
fn table_row_count_is_checked() {
    assert!(TruthTable::from_outputs(vec![0, 1], vec![true, false]).is_err());
    assert!(TruthTable::from_outputs(vec![0, 0], vec![true; 4]).is_err());
    let table = TruthTable::from_outputs(vec![], vec![true]).unwrap();
    assert_eq!(table.evaluate(mk_state("0")), Some(true));
}

// ========== Network definitions ==========

#[test]
fn definition_round_trip_through_json() {
    init_logger();
    let network = toggle_network().with_name("toggle");
    let relation = build_relation(&network, UpdateMode::Asynchronous).unwrap();
    let definition = NetworkDefinition::from_network(&network, Some(&relation));
    let json = definition.to_json().unwrap();

    let loaded = NetworkDefinition::from_json(&json).unwrap();
    assert_eq!(loaded, definition);
    assert_eq!(loaded.network().unwrap(), Some(network));
    assert_eq!(loaded.relation().unwrap(), Some(relation));
}

#[test]
fn definition_with_tables() {
    let json = r#"{
        "variables": ["a", "b"],
        "tables": {
            "a": { "inputs": ["b"], "outputs": { "0": 1, "1": 0 } }
        },
        "functions": { "b": "a" }
    }"#;
    let definition = NetworkDefinition::from_json(json).unwrap();
    let network = definition.network().unwrap().unwrap();
    assert!(network.next_value(0, mk_state("00")));
    assert!(!network.next_value(0, mk_state("01")));

    let exported = NetworkDefinition::from_network(&network, None);
    assert_eq!(exported.tables["a"].outputs.len(), 2);
    assert_eq!(exported.functions["b"], "a");
}

#[test]
fn malformed_definitions_are_format_errors() {
    let cases = [
        r#"{}"#,
        r#"{ "functions": { "x1": "x1 &" } }"#,
        r#"{ "functions": { "x1": "x2" } }"#,
        r#"{ "transitions": { "00": ["0a"] } }"#,
        r#"{ "functions": { "x1": "x1" }, "unknown": 1 }"#,
        r#"{ "variables": ["x1"], "transitions": { "00": [] } }"#,
        r#"{ "tables": { "x1": { "inputs": ["x1"], "outputs": { "0": 2 } } } }"#,
    ];
    for json in cases {
        assert!(
            NetworkDefinition::from_json(json).is_err(),
            "`{json}` should be rejected"
        );
    }
}

#[test]
fn transitions_only_definition_infers_variables() {
    let json = r#"{ "transitions": { "00": ["01", "00"], "01": ["11"] } }"#;
    let definition = NetworkDefinition::from_json(json).unwrap();
    assert_eq!(definition.variable_order().unwrap(), names(&["x1", "x2"]));
    assert!(definition.network().unwrap().is_none());
    let relation = definition.relation().unwrap().unwrap();
    assert_eq!(relation.mode(), UpdateMode::Asynchronous);
    assert_eq!(relation.successors(mk_state("00")), &[mk_state("01")]);
}

#[test_resources("resources/networks/*.json")]
fn bundled_definitions_load(path: &str) {
    init_logger();
    let json = std::fs::read_to_string(path).unwrap();
    let definition = NetworkDefinition::from_json(&json).unwrap();
    assert!(definition.name.is_some());
    if let Some(network) = definition.network().unwrap() {
        for mode in [UpdateMode::Synchronous, UpdateMode::Asynchronous] {
            let relation = build_relation(&network, mode).unwrap();
            assert_eq!(relation.num_states(), 1 << network.num_vars());
        }
    }
    if let Some(relation) = definition.relation().unwrap() {
        assert_eq!(relation.width(), definition.variable_order().unwrap().len());
    }
}
