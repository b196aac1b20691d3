//! Pass 5: declaration/assignment folding
//!
//! An assignment immediately following the declaration of the same
//! variable folds into the declaration; the declaration's own initializer
//! is dead and dropped.

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
        if let Instruction::Assignment { var, name, rhs } = &instruction {
            if let Some(Instruction::Declaration {
                var: decl_var,
                ty,
                name: decl_name,
                ..
            }) = out.last()
            {
                let same_binding = match (decl_var, var) {
                    (Some(a), Some(b)) => a == b,
                    _ => decl_name == name,
                };
                if same_binding {
                    let folded = Instruction::Declaration {
                        var: *decl_var,
                        ty: ty.clone(),
                        name: decl_name.clone(),
                        rhs: Some(rhs.clone()),
                    };
                    out.pop();
                    out.push(folded);
                    stats.merged_assignments += 1;
                    continue;
                }
            }
        }
        out.push(instruction);
    }
    out
}
