//! Pass 3: dead code after an exit
//!
//! Scans a list left to right; the moment a top-level return or throw is
//! emitted, every following sibling is unreachable and dropped. Else-less
//! check bodies are simplified on the way.

use crate::middle::ir::Instruction;
use crate::middle::passes::SimplifyStats;

pub fn run(list: Vec<Instruction>, stats: &mut SimplifyStats) -> Vec<Instruction> {
    let mut out = Vec::with_capacity(list.len());
    let mut iter = list.into_iter();
    for instruction in iter.by_ref() {
        let instruction = match instruction {
            Instruction::Check { cond, then, els: None } => {
                Instruction::Check { cond, then: run(then, stats), els: None }
            }
            Instruction::Block(inner) => Instruction::Block(run(inner, stats)),
            other => other,
        };
        let exits = instruction.is_exit();
        out.push(instruction);
        if exits {
            break;
        }
    }
    stats.dropped_unreachable += iter.count();
    out
}
