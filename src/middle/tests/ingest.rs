//! Ingestion classification tests

use crate::frontend::variable::{VarArena, VarId};
use crate::middle::ir::{ingest_block, Instruction};

fn arena_with(names: &[&str]) -> (VarArena, Vec<VarId>) {
    let mut arena = VarArena::new();
    let ids = names
        .iter()
        .map(|name| {
            let id = arena.alloc("String");
            let slot = arena.get_mut(id);
            slot.name = Some(name.to_string());
            slot.registered = true;
            id
        })
        .collect();
    (arena, ids)
}

#[test]
fn declarations_resolve_their_owning_variable() {
    let (arena, ids) = arena_with(&["text"]);
    let out = ingest_block("String text = getText();", &arena);
    assert_eq!(
        out,
        vec![Instruction::Declaration {
            var: Some(ids[0]),
            ty: "String".into(),
            name: "text".into(),
            rhs: Some("getText()".into()),
        }]
    );
}

#[test]
fn declarations_without_initializer_classify() {
    let (arena, ids) = arena_with(&["result"]);
    let out = ingest_block("String result;", &arena);
    assert_eq!(
        out,
        vec![Instruction::Declaration {
            var: Some(ids[0]),
            ty: "String".into(),
            name: "result".into(),
            rhs: None,
        }]
    );
}

#[test]
fn assignments_resolve_their_owning_variable() {
    let (arena, ids) = arena_with(&["result"]);
    let out = ingest_block("result = value;", &arena);
    assert_eq!(
        out,
        vec![Instruction::Assignment {
            var: Some(ids[0]),
            name: "result".into(),
            rhs: "value".into(),
        }]
    );
}

#[test]
fn unresolved_bindings_fall_back_to_opaque_statements() {
    let (arena, _) = arena_with(&[]);
    let out = ingest_block("mystery = value();\nint unknown = 1;", &arena);
    assert_eq!(
        out,
        vec![
            Instruction::Statement("mystery = value();".into()),
            Instruction::Statement("int unknown = 1;".into()),
        ]
    );
}

#[test]
fn returns_and_throws_classify() {
    let (arena, _) = arena_with(&[]);
    let out = ingest_block("return value;\nthrow new E(\"msg\");", &arena);
    assert_eq!(
        out,
        vec![
            Instruction::Return("value".into()),
            Instruction::Throw("new E(\"msg\")".into()),
        ]
    );
}

#[test]
fn checks_classify_recursively_with_optional_else() {
    let (arena, ids) = arena_with(&["result"]);
    let out = ingest_block(
        "if (v != null) {\nresult = v;\n} else {\nresult = fallback;\n}",
        &arena,
    );
    assert_eq!(
        out,
        vec![Instruction::Check {
            cond: "v != null".into(),
            then: vec![Instruction::Assignment {
                var: Some(ids[0]),
                name: "result".into(),
                rhs: "v".into(),
            }],
            els: Some(vec![Instruction::Assignment {
                var: Some(ids[0]),
                name: "result".into(),
                rhs: "fallback".into(),
            }]),
        }]
    );
}

#[test]
fn braceless_if_bodies_are_single_statements() {
    let (arena, _) = arena_with(&[]);
    let out = ingest_block("if (v == null) throw new E();", &arena);
    assert_eq!(
        out,
        vec![Instruction::Check {
            cond: "v == null".into(),
            then: vec![Instruction::Throw("new E()".into())],
            els: None,
        }]
    );
}

#[test]
fn bare_blocks_ingest_as_code_blocks() {
    let (arena, _) = arena_with(&[]);
    let out = ingest_block("{\nfirst();\nsecond();\n}", &arena);
    assert_eq!(
        out,
        vec![Instruction::Block(vec![
            Instruction::Statement("first();".into()),
            Instruction::Statement("second();".into()),
        ])]
    );
}

#[test]
fn anything_else_is_an_opaque_statement() {
    let (arena, _) = arena_with(&[]);
    let out = ingest_block("register(user);", &arena);
    assert_eq!(out, vec![Instruction::Statement("register(user);".into())]);
}

#[test]
fn semicolons_inside_literals_do_not_split_statements() {
    let (arena, _) = arena_with(&[]);
    let out = ingest_block("log(\"a;b\");\ndone();", &arena);
    assert_eq!(
        out,
        vec![
            Instruction::Statement("log(\"a;b\");".into()),
            Instruction::Statement("done();".into()),
        ]
    );
}

#[test]
fn comparisons_are_not_assignments() {
    let (arena, _) = arena_with(&["v"]);
    let out = ingest_block("v == null;", &arena);
    assert_eq!(out, vec![Instruction::Statement("v == null;".into())]);
}

#[test]
fn generic_declaration_types_survive() {
    let (arena, ids) = arena_with(&["names"]);
    let out = ingest_block("List<String> names = fetch();", &arena);
    assert_eq!(
        out,
        vec![Instruction::Declaration {
            var: Some(ids[0]),
            ty: "List<String>".into(),
            name: "names".into(),
            rhs: Some("fetch()".into()),
        }]
    );
}
