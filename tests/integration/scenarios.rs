//! End-to-end lowering scenarios
//!
//! Each test pins the exact rendered output for one canonical chain
//! shape, simplification included.

use unchain::{lower_chain, CallSite, ChainExprModel, LambdaArg, LowerConfig, NoResolver};

fn lower(calls: &[CallSite], model: ChainExprModel) -> String {
    lower_chain(calls, model, &NoResolver, &LowerConfig::default())
        .expect("lowering should succeed")
        .body
}

fn lambda(src: &str) -> LambdaArg {
    LambdaArg::parse(src).unwrap()
}

#[test]
fn tolerant_source_with_default_becomes_a_conditional_expression() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getText()").with_ty("String"),
        CallSite::new("orElse").with_expr("\"default\""),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "String text = getText();\n\
         result = (text != null) ? text : \"default\";"
    );
}

#[test]
fn asserting_source_with_get_guards_then_binds() {
    let calls = [
        CallSite::new("of").with_expr("source.getLine()").with_ty("String"),
        CallSite::new("get"),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "String line = source.getLine();\n\
         if (line == null) throw new NoSuchElementException(\"No value present\");\n\
         result = line;"
    );
}

#[test]
fn filtered_get_merges_both_guards_into_one_throw() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getText()").with_ty("String"),
        CallSite::new("filter").with_lambda(lambda("s -> s.startsWith(\"#\")")),
        CallSite::new("get"),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "String text = getText();\n\
         if (text == null || !text.startsWith(\"#\")) throw new NoSuchElementException(\"No value present\");\n\
         result = text;"
    );
}

#[test]
fn statically_absent_chain_collapses_to_the_default() {
    let calls = [
        CallSite::new("empty").with_ty("String"),
        CallSite::new("orElse").with_expr("\"fallback\""),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "result = \"fallback\";"
    );
}

#[test]
fn side_effecting_supplier_is_deferred_behind_the_mapped_value() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getToken()").with_ty("String"),
        CallSite::new("map").with_lambda(lambda("t -> t.getValue()")).with_ty("String"),
        CallSite::new("orElseGet").with_lambda(lambda("() -> readDefault()")),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "String value = null;\n\
         String token = getToken();\n\
         if (token != null) value = token.getValue();\n\
         result = (value == null) ? readDefault() : value;"
    );
}

#[test]
fn statically_absent_get_is_an_unconditional_throw() {
    let calls = [CallSite::new("empty").with_ty("String"), CallSite::new("get")];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "throw new NoSuchElementException(\"No value present\");"
    );
}
