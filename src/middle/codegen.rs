//! Code generator
//!
//! A continuation-passing walk over the operation records, terminal to
//! source. Each operation wraps the code that runs after it; the source
//! ends up outermost. `Or` is the one non-linear step: the parent prefix
//! is generated recursively with "store the primary result" as its
//! continuation, which lets the alternative chain come out as ordinary
//! nested `if`s instead of a runtime jump.

use tracing::{debug, trace};

use crate::error::LowerError;
use crate::frontend::binder::{bind_chain, OperationRecord};
use crate::frontend::ops::Operation;
use crate::frontend::variable::VarId;
use crate::middle::context::{Escape, GenContext};
use crate::util::text;

/// Generate the full statement text for a chain: bind records, run the
/// preprocessing sweep, register every output variable exactly once,
/// then wrap an empty continuation from the terminal back to the source.
pub fn generate_code(
    ctx: &mut GenContext<'_>,
    ops: Vec<Operation>,
) -> Result<String, LowerError> {
    let records = bind_chain(&mut ctx.arena, ops);
    debug!("generating code for {} operation record(s)", records.len());
    preprocess(ctx, &records);
    register(ctx, &records);
    let body = wrap_code(ctx, &records, String::new())?;
    Ok(ctx.assemble(&body))
}

fn preprocess(ctx: &mut GenContext<'_>, records: &[OperationRecord]) {
    for record in records {
        record
            .op
            .preprocess_variables(record.input, record.output, &mut ctx.arena, &mut ctx.reserved);
        preprocess(ctx, record.op.nested_records());
    }
}

fn register(ctx: &mut GenContext<'_>, records: &[OperationRecord]) {
    for record in records {
        register(ctx, record.op.nested_records());
        register_var(ctx, record.output);
    }
}

fn register_var(ctx: &mut GenContext<'_>, id: VarId) {
    if id.is_stub() || ctx.arena.get(id).registered {
        return;
    }
    if ctx.arena.get(id).known_absent {
        // renders as the absent sentinel; no name to pick
        ctx.arena.get_mut(id).registered = true;
        return;
    }
    if ctx.arena.get(id).reuse_existing {
        let name = ctx
            .arena
            .get(id)
            .candidates
            .first()
            .cloned()
            .expect("reused binding carries its host name");
        ctx.reserved.insert(name.clone());
        let slot = ctx.arena.get_mut(id);
        slot.name = Some(name);
        slot.registered = true;
        return;
    }
    let mut picks: Vec<String> = ctx.arena.get(id).candidates.iter().cloned().collect();
    picks.push("value".to_string());
    let chosen = picks
        .iter()
        .find(|base| !ctx.reserved.contains(base.as_str()))
        .cloned()
        .unwrap_or_else(|| {
            let base = &picks[0];
            (2..)
                .map(|n| format!("{base}{n}"))
                .find(|name| !ctx.reserved.contains(name.as_str()))
                .expect("some numbered name is free")
        });
    trace!("registered chain variable `{chosen}`");
    ctx.reserved.insert(chosen.clone());
    let slot = ctx.arena.get_mut(id);
    slot.name = Some(chosen);
    slot.registered = true;
}

/// Wrap `code` with every record, terminal end first.
pub fn wrap_code(
    ctx: &mut GenContext<'_>,
    records: &[OperationRecord],
    code: String,
) -> Result<String, LowerError> {
    let mut code = code;
    for index in (0..records.len()).rev() {
        let record = &records[index];
        if matches!(record.op, Operation::Or { .. }) {
            // hoist the merged result, then generate the prefix with
            // "store the primary value" as its continuation
            let out = record.output;
            let decl = format!(
                "{} {} = null;",
                ctx.arena.ty(out),
                ctx.arena.display_name(out)
            );
            ctx.before_step(decl);
            let or_code = generate(ctx, record, code)?;
            ctx.reset_else_scope();
            let store = format!(
                "{} = {};",
                ctx.arena.display_name(out),
                ctx.arena.display_name(record.input)
            );
            let prefix = wrap_code(ctx, &records[..index], store)?;
            return Ok(join_code(&prefix, &or_code));
        }
        code = generate(ctx, record, code)?;
    }
    Ok(code)
}

/// One operation's codegen: wrap the continuation in this operation's
/// binding and guard.
fn generate(
    ctx: &mut GenContext<'_>,
    record: &OperationRecord,
    code: String,
) -> Result<String, LowerError> {
    match &record.op {
        Operation::Empty { .. } => {
            // nothing to evaluate; the presence check can never hold
            Ok(ctx.wrap_guard("false", "true", &code, false))
        }
        Operation::Of { expr, reuse, .. } => {
            let name = ctx.arena.display_name(record.output).to_string();
            let binding = source_binding(ctx, record.output, expr, reuse.is_some());
            let present = format!("{name} != null");
            let absent = format!("{name} == null");
            let wrapped = if ctx.escape_available(true) {
                ctx.wrap_guard(&present, &absent, &code, true)
            } else {
                // source contract: never silently absent
                let assertion =
                    format!("if ({absent}) {{\nthrow new NullPointerException();\n}}");
                join_code(&assertion, &code)
            };
            Ok(join_code(&binding, &wrapped))
        }
        Operation::OfNullable { expr, reuse, .. } => {
            let name = ctx.arena.display_name(record.output).to_string();
            let binding = source_binding(ctx, record.output, expr, reuse.is_some());
            let present = format!("{name} != null");
            let absent = format!("{name} == null");
            let wrapped = ctx.wrap_guard(&present, &absent, &code, true);
            Ok(join_code(&binding, &wrapped))
        }
        Operation::Filter { pred } => {
            let input = ctx.arena.display_name(record.input).to_string();
            let cond = pred.transform(&[&input])?;
            let negated = text::negate_expr(&cond);
            Ok(ctx.wrap_guard(&cond, &negated, &code, true))
        }
        Operation::Map { f, .. } => {
            let input = ctx.arena.display_name(record.input).to_string();
            let name = ctx.arena.display_name(record.output).to_string();
            let rhs = f.transform(&[&input])?;
            let binding = if ctx.is_hoisted(record.output) {
                let decl = format!("{} {} = null;", ctx.arena.ty(record.output), name);
                ctx.before_step(decl);
                format!("{name} = {rhs};")
            } else {
                format!("{} {} = {};", ctx.arena.ty(record.output), name, rhs)
            };
            let present = format!("{name} != null");
            let absent = format!("{name} == null");
            let wrapped = ctx.wrap_guard(&present, &absent, &code, true);
            Ok(join_code(&binding, &wrapped))
        }
        Operation::Or { chain } => {
            let name = ctx.arena.display_name(record.output).to_string();
            let present = format!("{name} != null");
            let absent = format!("{name} == null");
            // the tail still sees the terminal's escape...
            let tail = ctx.wrap_guard(&present, &absent, &code, true);
            // ...the alternative region starts a fresh scope
            ctx.reset_else_scope();
            let sub_tail = chain.last().expect("sub-chain is never empty").output;
            let store = format!("{} = {};", name, ctx.arena.display_name(sub_tail));
            let sub = wrap_code(ctx, chain, store)?;
            Ok(format!("if ({absent}) {{\n{sub}\n}}\n{tail}"))
        }
        Operation::FlatMap { chain, bound } => {
            // macro-splice: the sub-chain was written against the bound
            // name; substitute the actual input and generate in place
            let input = ctx.arena.display_name(record.input).to_string();
            let renamed: Vec<OperationRecord> = chain
                .iter()
                .map(|r| OperationRecord {
                    input: r.input,
                    output: r.output,
                    op: r.op.renamed(bound, &input),
                })
                .collect();
            wrap_code(ctx, &renamed, code)
        }
        Operation::Get => {
            ctx.set_else_branch(Escape::exiting(
                "throw new NoSuchElementException(\"No value present\");",
            ));
            let input = ctx.arena.display_name(record.input).to_string();
            Ok(ctx.embed(&input))
        }
        Operation::OrElse { expr } => {
            ctx.set_initializer(expr.clone());
            let input = ctx.arena.display_name(record.input).to_string();
            Ok(ctx.embed(&input))
        }
        Operation::OrElseGet { f } => {
            if f.is_side_effect_free() {
                // a pure supplier is just a default value
                ctx.set_initializer(f.body().trim().to_string());
                let input = ctx.arena.display_name(record.input).to_string();
                return Ok(ctx.embed(&input));
            }
            let supplier = f.transform(&[])?;
            let take = ctx.embed(&supplier);
            if ctx.arena.get(record.input).known_absent {
                // nothing upstream can produce a value
                ctx.after_step(take);
                return Ok(String::new());
            }
            ctx.mark_hoisted(record.input);
            let name = ctx.arena.display_name(record.input).to_string();
            let keep = ctx.embed(&name);
            ctx.after_step(format!(
                "if ({name} == null) {{\n{take}\n}} else {{\n{keep}\n}}"
            ));
            Ok(String::new())
        }
        Operation::OrElseThrow { f } => {
            let exception = match f {
                Some(supplier) => supplier.transform(&[])?,
                None => "new NoSuchElementException(\"No value present\")".to_string(),
            };
            ctx.set_else_branch(Escape::exiting(format!("throw {exception};")));
            let input = ctx.arena.display_name(record.input).to_string();
            Ok(ctx.embed(&input))
        }
        Operation::IfPresent { f } => {
            let input = ctx.arena.display_name(record.input).to_string();
            let action = f.transform(&[&input])?;
            Ok(format!("{action};"))
        }
        Operation::IfPresentOrElse { f, g } => {
            let otherwise = g.transform(&[])?;
            ctx.set_else_branch(Escape::fallthrough(format!("{otherwise};")));
            let input = ctx.arena.display_name(record.input).to_string();
            let action = f.transform(&[&input])?;
            Ok(format!("{action};"))
        }
        Operation::IsPresent => {
            ctx.set_initializer("false");
            Ok(ctx.embed("true"))
        }
        Operation::IsEmpty => {
            ctx.set_initializer("true");
            Ok(ctx.embed("false"))
        }
        Operation::Stream => {
            ctx.set_initializer("Stream.empty()");
            let input = ctx.arena.display_name(record.input).to_string();
            let expr = format!("Stream.of({input})");
            Ok(ctx.embed(&expr))
        }
    }
}

/// Binding statement for a source operation. A bare reference to an
/// existing host binding is reused; everything else gets a declaration.
fn source_binding(ctx: &GenContext<'_>, output: VarId, expr: &str, reuse: bool) -> String {
    if reuse {
        return String::new();
    }
    let name = ctx.arena.display_name(output);
    format!("{} {} = {};", ctx.arena.ty(output), name, expr)
}

fn join_code(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a}\n{b}"),
    }
}
