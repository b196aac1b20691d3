//! Binder
//!
//! Walks an ordered operation list and threads chain variables through
//! it. Binding is pure and total: anything that could fail was rejected
//! earlier, during operation construction.

use crate::frontend::ops::Operation;
use crate::frontend::variable::{VarArena, VarId};

/// One bound step of a chain: input variable, output variable, operation
#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub input: VarId,
    pub output: VarId,
    pub op: Operation,
}

/// Thread chain variables through an operation list, starting from the
/// stub variable.
pub fn bind_chain(arena: &mut VarArena, ops: Vec<Operation>) -> Vec<OperationRecord> {
    let mut records = Vec::with_capacity(ops.len());
    let mut current = VarId::STUB;
    for op in ops {
        let output = op.out_var(arena, current);
        records.push(OperationRecord { input: current, output, op });
        current = output;
    }
    records
}
