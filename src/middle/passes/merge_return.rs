//! Pass 4: temporary elimination into a return
//!
//! A return of exactly the variable declared or last assigned by the
//! immediately preceding sibling replaces both with a single return of
//! that sibling's right-hand expression.

use crate::middle::ir::Instruction;
use crate::middle::passes::SimplifyStats;

pub fn run(list: Vec<Instruction>, stats: &mut SimplifyStats) -> Vec<Instruction> {
    let mut out: Vec<Instruction> = Vec::with_capacity(list.len());
    for instruction in list {
        let instruction = match instruction {
            Instruction::Check { cond, then, els: None } => {
                Instruction::Check { cond, then: run(then, stats), els: None }
            }
            Instruction::Block(inner) => Instruction::Block(run(inner, stats)),
            other => other,
        };
        if let Instruction::Return(expr) = &instruction {
            // fold as long as the new return keeps naming the previous
            // sibling's binding
            let mut expr = expr.clone();
            let mut folded = false;
            while let Some(rhs) = out.last().and_then(|prev| binding_rhs(prev, &expr)) {
                out.pop();
                expr = rhs;
                folded = true;
                stats.merged_returns += 1;
            }
            if folded {
                out.push(Instruction::Return(expr));
                continue;
            }
        }
        out.push(instruction);
    }
    out
}

/// The right-hand side of `prev`, if `prev` binds exactly the variable
/// the return expression names.
fn binding_rhs(prev: &Instruction, returned: &str) -> Option<String> {
    let returned = returned.trim();
    match prev {
        Instruction::Declaration { name, rhs: Some(rhs), .. } if name == returned => {
            Some(rhs.clone())
        }
        Instruction::Assignment { name, rhs, .. } if name == returned => Some(rhs.clone()),
        _ => None,
    }
}
