//! Rendering
//!
//! Turns the simplified instruction list back into statement text. Blocks
//! flatten into their statements; an if/else whose branches assign the
//! same binding (or both return) folds into a conditional expression.

use crate::middle::ir::{is_always_false, is_always_true, Instruction};
use crate::util::config::FmtConfig;
use crate::util::text;

/// Render a whole instruction list.
pub fn render_block(instructions: &[Instruction], fmt: &FmtConfig) -> String {
    let mut lines = Vec::new();
    for instruction in instructions {
        render_into(&mut lines, instruction, 0, fmt);
    }
    lines.join("\n")
}

fn render_into(lines: &mut Vec<String>, instruction: &Instruction, depth: usize, fmt: &FmtConfig) {
    let indent = " ".repeat(depth * fmt.indent_width);
    match instruction {
        Instruction::Block(inner) => {
            for instruction in inner {
                render_into(lines, instruction, depth, fmt);
            }
        }
        Instruction::Check { cond, then, els } => {
            if is_always_true(cond) {
                for instruction in then {
                    render_into(lines, instruction, depth, fmt);
                }
                return;
            }
            if is_always_false(cond) {
                for instruction in els.iter().flatten() {
                    render_into(lines, instruction, depth, fmt);
                }
                return;
            }
            if fmt.fold_conditional_assignments {
                if let Some(folded) = fold_conditional(cond, then, els.as_deref()) {
                    lines.push(format!("{indent}{folded}"));
                    return;
                }
            }
            if els.is_none() && fmt.inline_single_then {
                if let [only] = then.as_slice() {
                    if let Some(line) = simple_line(only) {
                        lines.push(format!("{indent}if ({cond}) {line}"));
                        return;
                    }
                }
            }
            lines.push(format!("{indent}if ({cond}) {{"));
            for instruction in then {
                render_into(lines, instruction, depth + 1, fmt);
            }
            match els {
                Some(els) => {
                    lines.push(format!("{indent}}} else {{"));
                    for instruction in els {
                        render_into(lines, instruction, depth + 1, fmt);
                    }
                    lines.push(format!("{indent}}}"));
                }
                None => lines.push(format!("{indent}}}")),
            }
        }
        other => {
            if let Some(line) = simple_line(other) {
                lines.push(format!("{indent}{line}"));
            }
        }
    }
}

/// Single-line form of a flat instruction.
fn simple_line(instruction: &Instruction) -> Option<String> {
    match instruction {
        Instruction::Statement(s) => Some(s.clone()),
        Instruction::Assignment { name, rhs, .. } => Some(format!("{name} = {rhs};")),
        Instruction::Declaration { ty, name, rhs: Some(rhs), .. } => {
            Some(format!("{ty} {name} = {rhs};"))
        }
        Instruction::Declaration { ty, name, rhs: None, .. } => Some(format!("{ty} {name};")),
        Instruction::Return(expr) if expr.is_empty() => Some("return;".to_string()),
        Instruction::Return(expr) => Some(format!("return {expr};")),
        Instruction::Throw(expr) => Some(format!("throw {expr};")),
        Instruction::Block(_) | Instruction::Check { .. } => None,
    }
}

/// `if (c) x = a; else x = b;` → `x = (c) ? a : b;`, and the matching
/// return form. Boolean-literal arms collapse to the condition itself.
fn fold_conditional(
    cond: &str,
    then: &[Instruction],
    els: Option<&[Instruction]>,
) -> Option<String> {
    let els = els?;
    match (then, els) {
        (
            [Instruction::Assignment { name: then_name, rhs: a, .. }],
            [Instruction::Assignment { name: else_name, rhs: b, .. }],
        ) if then_name == else_name => Some(format!("{then_name} = {};", ternary(cond, a, b))),
        ([Instruction::Return(a)], [Instruction::Return(b)]) if !a.is_empty() && !b.is_empty() => {
            Some(format!("return {};", ternary(cond, a, b)))
        }
        _ => None,
    }
}

fn ternary(cond: &str, a: &str, b: &str) -> String {
    if a == "true" && b == "false" {
        return cond.to_string();
    }
    if a == "false" && b == "true" {
        return text::negate_expr(cond);
    }
    format!("({cond}) ? {a} : {b}")
}
