//! Tests for expression parsing and evaluation.

use crate::error::FormatError;
use crate::expression::{BoundExpression, Expression, MAX_NESTING, evaluate};
use crate::state::State;
use std::collections::HashMap;
use std::str::FromStr;

// ========== Helper functions ==========

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|it| it.to_string()).collect()
}

// ========== Parsing ==========

#[test]
fn and_binds_tighter_than_or() {
    let expr = Expression::parse("a | b & c").unwrap();
    assert_eq!(
        expr,
        Expression::Or(vec![
            Expression::Variable("a".to_string()),
            Expression::And(vec![
                Expression::Variable("b".to_string()),
                Expression::Variable("c".to_string()),
            ]),
        ])
    );
}

#[test]
fn both_negation_styles_are_accepted() {
    let tilde = Expression::parse("~x1 & ~(x2 | x3)").unwrap();
    let bang = Expression::parse("!x1 && !(x2 || x3)").unwrap();
    assert_eq!(tilde, bang);
    assert_eq!(tilde.to_string(), "~x1 & ~(x2 | x3)");
    assert_eq!(tilde.to_aeon_string(), "!x1 & !(x2 | x3)");
}

#[test]
fn constants_parse_and_render() {
    assert_eq!(Expression::parse("0").unwrap(), Expression::Constant(false));
    assert_eq!(Expression::parse("true").unwrap(), Expression::Constant(true));
    assert_eq!(Expression::parse("(1)").unwrap().to_string(), "1");
    assert_eq!(Expression::parse("~0").unwrap().to_aeon_string(), "!false");
}

#[test]
fn display_output_parses_back_to_same_expression() {
    for text in ["(x1 & ~x2) | x3", "~(a | b) & c", "x1", "~~x1", "(a | b) & (c | d)"] {
        let expr = Expression::parse(text).unwrap();
        let again = Expression::parse(&expr.to_string()).unwrap();
        assert_eq!(expr, again, "{text}");
    }
}

#[test]
fn malformed_expressions_are_format_errors() {
    for text in ["", "x1 &", "(x1 | x2", "x1 x2", "x1 + x2", "x1 & 2", ")"] {
        let result = Expression::parse(text);
        assert!(
            matches!(result, Err(FormatError::Expression { .. })),
            "`{text}` should not parse: {result:?}"
        );
    }
}

#[test]
fn nesting_is_bounded() {
    let nested = |depth: usize| format!("{}x1{}", "(".repeat(depth), ")".repeat(depth));
    let expr = Expression::parse(&nested(MAX_NESTING)).unwrap();
    assert_eq!(expr, Expression::Variable("x1".to_string()));

    for text in [
        nested(MAX_NESTING + 1),
        nested(200_000),
        format!("{}x1", "~".repeat(200_000)),
        format!("{}x1 | x2{}", "~(".repeat(100_000), ")".repeat(100_000)),
    ] {
        let Err(FormatError::Expression { reason, .. }) = Expression::parse(&text) else {
            panic!("deep nesting should be a format error");
        };
        assert_eq!(reason, "nesting too deep");
    }

    let negated = Expression::parse(&format!("{}x1", "~".repeat(MAX_NESTING))).unwrap();
    let assignment: &[(&str, bool)] = &[("x1", true)];
    assert_eq!(negated.evaluate(assignment), Ok(true));
}

// ========== Evaluation ==========

#[test]
fn evaluation_over_named_assignment() {
    let expr = Expression::parse("C | (!A & B)").unwrap();
    let mut assignment = HashMap::new();
    assignment.insert("A".to_string(), false);
    assignment.insert("B".to_string(), true);
    assignment.insert("C".to_string(), false);
    assert!(expr.evaluate(&assignment).unwrap());
    assignment.insert("A".to_string(), true);
    assert!(!expr.evaluate(&assignment).unwrap());
}

#[test]
fn missing_variable_is_reported() {
    let assignment: &[(&str, bool)] = &[("x1", true)];
    let result = evaluate("x1 | x2", assignment);
    assert_eq!(result, Err(FormatError::MissingVariable("x2".to_string())));
}

#[test]
fn bound_expression_agrees_with_named_evaluation() {
    let variables = names(&["x1", "x2", "x3"]);
    let expr = Expression::parse("(x1 & ~x2) | (x2 & x3)").unwrap();
    let bound = BoundExpression::bind(&expr, &variables).unwrap();
    for state in State::all(3) {
        let assignment: HashMap<String, bool> = variables
            .iter()
            .cloned()
            .zip(state.values())
            .collect();
        assert_eq!(bound.eval(state), expr.evaluate(&assignment).unwrap());
    }
    assert_eq!(bound.support().into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn binding_rejects_undeclared_variables() {
    let expr = Expression::from_str("x1 & y").unwrap();
    let result = BoundExpression::bind(&expr, &names(&["x1", "x2"]));
    assert_eq!(result, Err(FormatError::UnknownVariable("y".to_string())));
}
