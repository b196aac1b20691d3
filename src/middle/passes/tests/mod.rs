//! Simplifier pass tests


use crate::middle::ir::Instruction;

pub(crate) fn stmt(text: &str) -> Instruction {
    Instruction::Statement(text.to_string())
}

pub(crate) fn assign(name: &str, rhs: &str) -> Instruction {
    Instruction::Assignment { var: None, name: name.to_string(), rhs: rhs.to_string() }
}

pub(crate) fn decl(name: &str, rhs: &str) -> Instruction {
    Instruction::Declaration {
        var: None,
        ty: "String".to_string(),
        name: name.to_string(),
        rhs: Some(rhs.to_string()),
    }
}

pub(crate) fn check(cond: &str, then: Vec<Instruction>) -> Instruction {
    Instruction::Check { cond: cond.to_string(), then, els: None }
}

pub(crate) fn check_else(
    cond: &str,
    then: Vec<Instruction>,
    els: Vec<Instruction>,
) -> Instruction {
    Instruction::Check { cond: cond.to_string(), then, els: Some(els) }
}

pub(crate) fn ret(expr: &str) -> Instruction {
    Instruction::Return(expr.to_string())
}

pub(crate) fn throw(expr: &str) -> Instruction {
    Instruction::Throw(expr.to_string())
}
