//! Total-or-nothing behavior: anything unsupported aborts the attempt

use unchain::{lower_chain, CallSite, ChainExprModel, LambdaArg, LowerConfig, LowerError, NoResolver};

fn try_lower(calls: &[CallSite]) -> Result<String, LowerError> {
    lower_chain(calls, ChainExprModel::assign("result"), &NoResolver, &LowerConfig::default())
        .map(|lowered| lowered.body)
}

#[test]
fn unknown_operation_names_abort() {
    let calls = [
        CallSite::new("ofNullable").with_expr("x").with_ty("String"),
        CallSite::new("peek").with_lambda(LambdaArg::parse("v -> log(v)").unwrap()),
        CallSite::new("get"),
    ];
    assert!(matches!(
        try_lower(&calls),
        Err(LowerError::UnsupportedCall { name, arity: 1 }) if name == "peek"
    ));
}

#[test]
fn wrong_arities_abort() {
    let calls = [
        CallSite::new("of").with_expr("a").with_expr("b"),
        CallSite::new("get"),
    ];
    assert!(matches!(try_lower(&calls), Err(LowerError::UnsupportedCall { arity: 2, .. })));
}

#[test]
fn malformed_chain_shapes_abort() {
    // no source
    let headless = [CallSite::new("get")];
    assert!(matches!(try_lower(&headless), Err(LowerError::UnsupportedShape { .. })));

    // no terminal
    let tailless = [CallSite::new("ofNullable").with_expr("x")];
    assert!(matches!(try_lower(&tailless), Err(LowerError::UnsupportedShape { .. })));

    // terminal in the middle
    let early_terminal = [
        CallSite::new("ofNullable").with_expr("x"),
        CallSite::new("get"),
        CallSite::new("isPresent"),
    ];
    assert!(matches!(try_lower(&early_terminal), Err(LowerError::UnsupportedShape { .. })));
}

#[test]
fn lambda_arity_mismatches_abort() {
    let calls = [
        CallSite::new("ofNullable").with_expr("x").with_ty("String"),
        CallSite::new("orElseGet").with_lambda(LambdaArg::parse("v -> v").unwrap()),
    ];
    assert!(matches!(try_lower(&calls), Err(LowerError::UnsupportedLambda { .. })));
}

#[test]
fn nested_chain_with_a_terminal_aborts() {
    let calls = [
        CallSite::new("ofNullable").with_expr("x").with_ty("String"),
        CallSite::new("or").with_chain(
            "",
            vec![
                CallSite::new("ofNullable").with_expr("y").with_ty("String"),
                CallSite::new("get"),
            ],
        ),
        CallSite::new("get"),
    ];
    assert!(matches!(try_lower(&calls), Err(LowerError::UnsupportedShape { .. })));
}

#[test]
fn shadowed_candidate_names_are_renamed_instead_of_captured() {
    // the obvious variable name is `s`, but a literal nested inside the
    // filter body binds `s` itself; the chain variable must step aside
    let calls = [
        CallSite::new("ofNullable").with_expr("getS()").with_ty("String"),
        CallSite::new("filter")
            .with_lambda(LambdaArg::parse("v -> names.stream().anyMatch(s -> s.equals(v))").unwrap()),
        CallSite::new("get"),
    ];
    let lowered = try_lower(&calls).unwrap();
    assert!(lowered.contains("String value = getS();"), "got:\n{lowered}");
    assert!(lowered.contains("names.stream().anyMatch(s -> s.equals(value))"));
}
