//! Operation model
//!
//! The tagged union of source / intermediate / terminal operations. A
//! closed enum with exhaustive matching means every consumer — the
//! binder, the code generator, the renamer — provably handles every
//! operation kind.

use indexmap::IndexSet;

use crate::frontend::binder::OperationRecord;
use crate::frontend::lambda::LambdaArg;
use crate::frontend::variable::{VarArena, VarId};
use crate::util::text;

/// Where an operation sits in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpRole {
    /// Produces the first chain variable
    Source,
    /// Transforms one chain variable into the next
    Intermediate,
    /// Consumes the chain and decides the pipeline's result
    Terminal,
}

/// One operation of an optional chain
#[derive(Debug, Clone)]
pub enum Operation {
    /// Statically absent source
    Empty { ty: String },
    /// Source that asserts presence (absence is a programming error)
    Of { expr: String, ty: String, reuse: Option<String> },
    /// Source that tolerates absence
    OfNullable { expr: String, ty: String, reuse: Option<String> },
    /// Transform the present value
    Map { f: LambdaArg, ty: String },
    /// Drop the value unless the predicate holds
    Filter { pred: LambdaArg },
    /// Fall back to an alternative chain when absent
    Or { chain: Vec<OperationRecord> },
    /// Splice a dependent chain in place
    FlatMap { chain: Vec<OperationRecord>, bound: String },
    Get,
    OrElse { expr: String },
    OrElseGet { f: LambdaArg },
    OrElseThrow { f: Option<LambdaArg> },
    IfPresent { f: LambdaArg },
    IfPresentOrElse { f: LambdaArg, g: LambdaArg },
    IsPresent,
    IsEmpty,
    Stream,
}

impl Operation {
    /// Role of this operation in a chain
    pub fn role(&self) -> OpRole {
        match self {
            Operation::Empty { .. } | Operation::Of { .. } | Operation::OfNullable { .. } => {
                OpRole::Source
            }
            Operation::Map { .. }
            | Operation::Filter { .. }
            | Operation::Or { .. }
            | Operation::FlatMap { .. } => OpRole::Intermediate,
            Operation::Get
            | Operation::OrElse { .. }
            | Operation::OrElseGet { .. }
            | Operation::OrElseThrow { .. }
            | Operation::IfPresent { .. }
            | Operation::IfPresentOrElse { .. }
            | Operation::IsPresent
            | Operation::IsEmpty
            | Operation::Stream => OpRole::Terminal,
        }
    }

    /// The variable bound to this operation's result.
    ///
    /// Pure in the sense that it depends only on the operation and its
    /// input; sources and `Map`/`Or` allocate a fresh slot, everything
    /// else passes the input through.
    pub fn out_var(&self, arena: &mut VarArena, input: VarId) -> VarId {
        match self {
            Operation::Empty { ty } => {
                let id = arena.alloc(ty.clone());
                arena.get_mut(id).known_absent = true;
                id
            }
            Operation::Of { ty, .. } | Operation::OfNullable { ty, .. } => arena.alloc(ty.clone()),
            Operation::Map { ty, .. } => arena.alloc(ty.clone()),
            Operation::Filter { .. } => input,
            Operation::Or { .. } => {
                let ty = arena.ty(input).to_string();
                arena.alloc(ty)
            }
            Operation::FlatMap { chain, .. } => {
                chain.last().map(|record| record.output).unwrap_or(input)
            }
            _ => input,
        }
    }

    /// Embedded sub-chain records (`Or`, `FlatMap`); empty otherwise
    pub fn nested_records(&self) -> &[OperationRecord] {
        match self {
            Operation::Or { chain } | Operation::FlatMap { chain, .. } => chain,
            _ => &[],
        }
    }

    /// Immutable-update rename: a copy of this operation with every
    /// captured reference to `old` replaced by `new`, nested sub-chains
    /// included.
    pub fn renamed(&self, old: &str, new: &str) -> Operation {
        let sub = |e: &String| text::replace_ident(e, old, new);
        match self {
            Operation::Empty { ty } => Operation::Empty { ty: ty.clone() },
            Operation::Of { expr, ty, reuse } => Operation::Of {
                expr: sub(expr),
                ty: ty.clone(),
                reuse: reuse.clone(),
            },
            Operation::OfNullable { expr, ty, reuse } => Operation::OfNullable {
                expr: sub(expr),
                ty: ty.clone(),
                reuse: reuse.clone(),
            },
            Operation::Map { f, ty } => Operation::Map { f: f.renamed(old, new), ty: ty.clone() },
            Operation::Filter { pred } => Operation::Filter { pred: pred.renamed(old, new) },
            Operation::Or { chain } => Operation::Or { chain: rename_records(chain, old, new) },
            Operation::FlatMap { chain, bound } => Operation::FlatMap {
                chain: rename_records(chain, old, new),
                bound: bound.clone(),
            },
            Operation::Get => Operation::Get,
            Operation::OrElse { expr } => Operation::OrElse { expr: sub(expr) },
            Operation::OrElseGet { f } => Operation::OrElseGet { f: f.renamed(old, new) },
            Operation::OrElseThrow { f } => Operation::OrElseThrow {
                f: f.as_ref().map(|l| l.renamed(old, new)),
            },
            Operation::IfPresent { f } => Operation::IfPresent { f: f.renamed(old, new) },
            Operation::IfPresentOrElse { f, g } => Operation::IfPresentOrElse {
                f: f.renamed(old, new),
                g: g.renamed(old, new),
            },
            Operation::IsPresent => Operation::IsPresent,
            Operation::IsEmpty => Operation::IsEmpty,
            Operation::Stream => Operation::Stream,
        }
    }

    /// Contribute name candidates for this operation's variables and
    /// reserve every captured function-literal parameter, so a chosen
    /// chain-variable name can never collide with an inner parameter.
    pub fn preprocess_variables(
        &self,
        input: VarId,
        output: VarId,
        arena: &mut VarArena,
        reserved: &mut IndexSet<String>,
    ) {
        for lambda in self.lambdas() {
            for i in 0..lambda.arity() {
                if let Some(name) = lambda.parameter_name(i) {
                    reserved.insert(name.to_string());
                }
            }
            // parameters of literals nested inside the body shadow too
            for name in text::lambda_param_names(lambda.body()) {
                reserved.insert(name);
            }
        }
        match self {
            Operation::Of { expr, reuse, .. } | Operation::OfNullable { expr, reuse, .. } => {
                if let Some(existing) = reuse {
                    arena.get_mut(output).reuse_existing = true;
                    arena.add_candidate(output, existing.clone());
                } else if let Some(name) = text::suggest_name_from_expr(expr) {
                    arena.add_candidate(output, name);
                }
            }
            Operation::Map { f, .. } => {
                for name in f.suggest_output_names() {
                    arena.add_candidate(output, name);
                }
            }
            Operation::Or { .. } => {
                if !input.is_stub() {
                    let inherited: Vec<String> =
                        arena.get(input).candidates.iter().cloned().collect();
                    for name in inherited {
                        arena.add_candidate(output, name);
                    }
                }
            }
            _ => {}
        }
    }

    /// Every function literal captured by this operation
    fn lambdas(&self) -> Vec<&LambdaArg> {
        match self {
            Operation::Map { f, .. }
            | Operation::OrElseGet { f }
            | Operation::IfPresent { f } => vec![f],
            Operation::Filter { pred } => vec![pred],
            Operation::OrElseThrow { f } => f.iter().collect(),
            Operation::IfPresentOrElse { f, g } => vec![f, g],
            _ => Vec::new(),
        }
    }
}

fn rename_records(records: &[OperationRecord], old: &str, new: &str) -> Vec<OperationRecord> {
    records
        .iter()
        .map(|record| OperationRecord {
            input: record.input,
            output: record.output,
            op: record.op.renamed(old, new),
        })
        .collect()
}
