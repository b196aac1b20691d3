//! Pass 1: dead-branch elimination
//!
//! For every else-less check, the body is simplified first. A check whose
//! body ends up empty, or whose condition is statically false, disappears
//! entirely; a check whose condition is statically true is replaced by
//! its (already simplified) body.

use crate::middle::ir::{is_always_false, is_always_true, Instruction};
use crate::middle::passes::SimplifyStats;

pub fn run(list: Vec<Instruction>, stats: &mut SimplifyStats) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(list.len());
    for instruction in list {
        match instruction {
            Instruction::Check { cond, then, els: None } => {
                let then = run(then, stats);
                if then.is_empty() || is_always_false(&cond) {
                    stats.removed_checks += 1;
                    continue;
                }
                if is_always_true(&cond) {
                    stats.spliced_checks += 1;
                    out.extend(then);
                    continue;
                }
                out.push(Instruction::Check { cond, then, els: None });
            }
            Instruction::Block(inner) => out.push(Instruction::Block(run(inner, stats))),
            other => out.push(other),
        }
    }
    out
}
