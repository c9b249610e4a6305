//! Black-box integration tests against the public API only: no internal
//! module is reachable from here, matching how an embedder would use the
//! crate.

use std::rc::Rc;

use condeval::{parse, EvaluationContext, ExtensionFunction, ExtensionRegistry, NullTraceWriter, StateNode, Value};

fn ctx(state: Rc<StateNode>) -> EvaluationContext<'static> {
    EvaluationContext::new(&NullTraceWriter, state)
}

fn registry_with_test_data(state: Rc<StateNode>) -> ExtensionRegistry {
    let mut extensions = ExtensionRegistry::new();
    extensions
        .register("testData", 0, Some(0), move || -> Rc<dyn ExtensionFunction> {
            let state = state.clone();
            Rc::new(move |_: &[Value], _: &EvaluationContext, _: usize| Ok(Value::from(state.clone())))
        })
        .unwrap();
    extensions
}

#[test]
fn full_condition_gate_mirrors_a_ci_agent_expression() {
    let extensions = registry_with_test_data(Rc::new(StateNode::Null));
    let ast = parse(
        "and(eq(testData(), testData()), or(gt(2, 1), eq(1, 2)))",
        &NullTraceWriter,
        &extensions,
    )
    .unwrap();
    assert_eq!(ast.evaluate_boolean(&ctx(Rc::new(StateNode::Null))).unwrap(), true);
}

#[test]
fn deeply_nested_arithmetic_style_comparisons_short_circuit_correctly() {
    let ast = parse(
        "or(eq(1, 2), and(gt(3, 2), lt(1, 2), ge(2, 2)))",
        &NullTraceWriter,
        &ExtensionRegistry::new(),
    )
    .unwrap();
    assert_eq!(ast.evaluate_boolean(&ctx(Rc::new(StateNode::Null))).unwrap(), true);
}

#[test]
fn in_and_not_in_are_consistent_across_every_candidate() {
    let registry = ExtensionRegistry::new();
    let is_in = parse("in('b', 'a', 'b', 'c')", &NullTraceWriter, &registry)
        .unwrap()
        .evaluate_boolean(&ctx(Rc::new(StateNode::Null)))
        .unwrap();
    let not_in = parse("notIn('b', 'a', 'b', 'c')", &NullTraceWriter, &registry)
        .unwrap()
        .evaluate_boolean(&ctx(Rc::new(StateNode::Null)))
        .unwrap();
    assert!(is_in);
    assert!(!not_in);
}

#[test]
fn array_indexing_round_trips_through_a_registered_extension() {
    let doc = serde_json::json!({"array": ["a0", "a1", "a2"]});
    let state = StateNode::from_json(&doc);
    let extensions = registry_with_test_data(state.clone());
    let ast = parse("eq('a1', testData().array[1])", &NullTraceWriter, &extensions).unwrap();
    assert_eq!(ast.evaluate_boolean(&ctx(state)).unwrap(), true);
}

#[test]
fn out_of_range_array_index_is_null_not_an_error() {
    let doc = serde_json::json!({"array": ["a0"]});
    let state = StateNode::from_json(&doc);
    let extensions = registry_with_test_data(state.clone());
    let ast = parse("testData().array[99]", &NullTraceWriter, &extensions).unwrap();
    assert_eq!(ast.evaluate(&ctx(state)).unwrap(), Value::Null);
}

#[test]
fn startswith_and_endswith_are_case_insensitive() {
    let registry = ExtensionRegistry::new();
    let starts = parse("startsWith('Production', 'prod')", &NullTraceWriter, &registry)
        .unwrap()
        .evaluate_boolean(&ctx(Rc::new(StateNode::Null)))
        .unwrap();
    let ends = parse("endsWith('Production', 'TION')", &NullTraceWriter, &registry)
        .unwrap()
        .evaluate_boolean(&ctx(Rc::new(StateNode::Null)))
        .unwrap();
    assert!(starts);
    assert!(ends);
}

#[test]
fn unregistered_extension_name_is_simply_unrecognized() {
    let err = parse("succeeded()", &NullTraceWriter, &ExtensionRegistry::new()).unwrap_err();
    assert_eq!(err.kind, condeval::ParseErrorKind::UnrecognizedValue);
}

#[test]
fn version_ordering_respects_component_count() {
    let registry = ExtensionRegistry::new();
    let ast = parse("ge(1.2.3, 1.2.0)", &NullTraceWriter, &registry).unwrap();
    assert_eq!(ast.evaluate_boolean(&ctx(Rc::new(StateNode::Null))).unwrap(), true);

    let mismatched = parse("ge(1.2.3, 1.2)", &NullTraceWriter, &registry).unwrap();
    assert!(mismatched.evaluate(&ctx(Rc::new(StateNode::Null))).is_err());
}
