//! Pass 2: condition merging
//!
//! A check whose sole body statement is itself an else-less check
//! collapses into one check with the conjunction of both conditions
//! (operand precedence preserved). A check guarding only a throw merges
//! with an immediately preceding sibling guarding an equivalent throw,
//! into one check with the disjunction of both conditions and the later
//! throw's body.

use crate::middle::ir::Instruction;
use crate::middle::passes::SimplifyStats;
use crate::util::text;

pub fn run(list: Vec<Instruction>, stats: &mut SimplifyStats) -> Vec<Instruction> {
    let mut out: Vec<Instruction> = Vec::with_capacity(list.len());
    for instruction in list {
        let instruction = match instruction {
            Instruction::Check { cond, then, els: None } => {
                let mut cond = cond;
                let mut then = run(then, stats);
                // collapse sole-body nesting, however deep
                while let [Instruction::Check { els: None, .. }] = then.as_slice() {
                    let Some(Instruction::Check { cond: inner_cond, then: inner_then, .. }) =
                        then.pop()
                    else {
                        unreachable!();
                    };
                    cond = text::and_join(&cond, &inner_cond);
                    then = inner_then;
                    stats.merged_conditions += 1;
                }
                Instruction::Check { cond, then, els: None }
            }
            Instruction::Block(inner) => Instruction::Block(run(inner, stats)),
            other => other,
        };
        push_merging_throws(&mut out, instruction, stats);
    }
    out
}

/// Append, folding a guarded throw into an equivalent one right before it.
fn push_merging_throws(
    out: &mut Vec<Instruction>,
    instruction: Instruction,
    stats: &mut SimplifyStats,
) {
    if let Some(later) = sole_guarded_throw(&instruction) {
        if let Some(previous) = out.last() {
            if let Some(earlier) = sole_guarded_throw(previous) {
                if text::equivalent(&earlier.throw, &later.throw) {
                    let merged = Instruction::Check {
                        cond: text::or_join(&earlier.cond, &later.cond),
                        then: vec![Instruction::Throw(later.throw)],
                        els: None,
                    };
                    out.pop();
                    stats.merged_throws += 1;
                    // the merged node may in turn neighbor another guard
                    push_merging_throws(out, merged, stats);
                    return;
                }
            }
        }
    }
    out.push(instruction);
}

struct GuardedThrow {
    cond: String,
    throw: String,
}

fn sole_guarded_throw(instruction: &Instruction) -> Option<GuardedThrow> {
    if let Instruction::Check { cond, then, els: None } = instruction {
        if let [Instruction::Throw(expr)] = then.as_slice() {
            return Some(GuardedThrow { cond: cond.clone(), throw: expr.clone() });
        }
    }
    None
}
