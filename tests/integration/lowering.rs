//! Lowering behavior across the operation vocabulary

use unchain::{
    lower_chain, lower_chain_in_scope, CallSite, ChainExprModel, LambdaArg, LowerConfig,
    NoResolver,
};

fn lower(calls: &[CallSite], model: ChainExprModel) -> String {
    lower_chain(calls, model, &NoResolver, &LowerConfig::default())
        .expect("lowering should succeed")
        .body
}

fn lambda(src: &str) -> LambdaArg {
    LambdaArg::parse(src).unwrap()
}

#[test]
fn return_model_exits_early_instead_of_folding() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getText()").with_ty("String"),
        CallSite::new("orElse").with_expr("\"default\""),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::Return),
        "String text = getText();\n\
         if (text == null) return \"default\";\n\
         return text;"
    );
}

#[test]
fn declare_model_declares_the_result_up_front() {
    let calls = [
        CallSite::new("of").with_expr("source.getLine()").with_ty("String"),
        CallSite::new("get"),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::declare("String", "line")),
        "String line;\n\
         String value = source.getLine();\n\
         if (value == null) throw new NoSuchElementException(\"No value present\");\n\
         line = value;"
    );
}

#[test]
fn if_present_guards_the_consumer() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getUser()").with_ty("User"),
        CallSite::new("ifPresent").with_lambda(lambda("u -> register(u)")),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::Statement),
        "User user = getUser();\n\
         if (user != null) register(user);"
    );
}

#[test]
fn if_present_or_else_keeps_both_actions() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getUser()").with_ty("User"),
        CallSite::new("ifPresentOrElse")
            .with_lambda(lambda("u -> register(u)"))
            .with_lambda(lambda("() -> audit()")),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::Statement),
        "User user = getUser();\n\
         if (user != null) {\n\
         \u{20}   register(user);\n\
         } else {\n\
         \u{20}   audit();\n\
         }"
    );
}

#[test]
fn presence_queries_fold_to_boolean_expressions() {
    let present = [
        CallSite::new("ofNullable").with_expr("getUser()").with_ty("User"),
        CallSite::new("isPresent"),
    ];
    assert_eq!(
        lower(&present, ChainExprModel::assign("found")),
        "User user = getUser();\n\
         found = user != null;"
    );

    let empty = [
        CallSite::new("ofNullable").with_expr("getUser()").with_ty("User"),
        CallSite::new("isEmpty"),
    ];
    assert_eq!(
        lower(&empty, ChainExprModel::assign("missing")),
        "User user = getUser();\n\
         missing = user == null;"
    );
}

#[test]
fn stream_terminal_falls_back_to_the_empty_stream() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getItem()").with_ty("Item"),
        CallSite::new("stream"),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::Return),
        "Item item = getItem();\n\
         if (item == null) return Stream.empty();\n\
         return Stream.of(item);"
    );
}

#[test]
fn or_else_throw_uses_the_supplied_exception() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getText()").with_ty("String"),
        CallSite::new("orElseThrow")
            .with_lambda(lambda("() -> new IllegalStateException(\"missing\")")),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "String text = getText();\n\
         if (text == null) throw new IllegalStateException(\"missing\");\n\
         result = text;"
    );
}

#[test]
fn alternative_chains_merge_through_a_hoisted_binding() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getPrimary()").with_ty("String"),
        CallSite::new("or").with_chain(
            "",
            vec![CallSite::new("ofNullable").with_expr("getBackup()").with_ty("String")],
        ),
        CallSite::new("orElseThrow")
            .with_lambda(lambda("() -> new IllegalStateException(\"missing\")")),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "String value = null;\n\
         String primary = getPrimary();\n\
         if (primary != null) value = primary;\n\
         if (value == null) {\n\
         \u{20}   String backup = getBackup();\n\
         \u{20}   if (backup != null) value = backup;\n\
         }\n\
         if (value == null) throw new IllegalStateException(\"missing\");\n\
         result = value;"
    );
}

#[test]
fn flat_map_splices_the_dependent_chain_in_place() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getOrder()").with_ty("Order"),
        CallSite::new("flatMap").with_chain(
            "o",
            vec![CallSite::new("ofNullable").with_expr("o.getCustomer()").with_ty("Customer")],
        ),
        CallSite::new("get"),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "Order order = getOrder();\n\
         if (order == null) throw new NoSuchElementException(\"No value present\");\n\
         Customer customer = order.getCustomer();\n\
         if (customer == null) throw new NoSuchElementException(\"No value present\");\n\
         result = customer;"
    );
}

#[test]
fn reused_host_bindings_skip_the_declaration() {
    use unchain::frontend::calls::ScopeResolver;

    let calls = [
        CallSite::new("ofNullable").with_expr("existing").with_ty("String"),
        CallSite::new("orElse").with_expr("\"default\""),
    ];
    let resolver = ScopeResolver::new(["existing"]);
    let lowered = lower_chain(
        &calls,
        ChainExprModel::assign("result"),
        &resolver,
        &LowerConfig::default(),
    )
    .unwrap();
    assert_eq!(lowered.body, "result = (existing != null) ? existing : \"default\";");
}

#[test]
fn taken_names_in_the_host_scope_are_avoided() {
    let calls = [
        CallSite::new("ofNullable").with_expr("a + b").with_ty("String"),
        CallSite::new("get"),
    ];
    let lowered = lower_chain_in_scope(
        &calls,
        ChainExprModel::assign("result"),
        &NoResolver,
        &["value"],
        &LowerConfig::default(),
    )
    .unwrap();
    assert!(lowered.body.contains("String value2 = a + b;"));
}

#[test]
fn pure_supplier_defaults_behave_like_plain_defaults() {
    let calls = [
        CallSite::new("ofNullable").with_expr("getName()").with_ty("String"),
        CallSite::new("orElseGet").with_lambda(lambda("() -> \"anonymous\"")),
    ];
    assert_eq!(
        lower(&calls, ChainExprModel::assign("result")),
        "String name = getName();\n\
         result = (name != null) ? name : \"anonymous\";"
    );
}
