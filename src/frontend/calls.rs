//! Call-site classification
//!
//! The host hands over an ordered list of call-site descriptors, already
//! filtered to calls on the optional-chain type. Classification turns
//! them into [`Operation`]s, binding nested sub-chains on the way. Any
//! name or arity outside the recognized vocabulary aborts the lowering.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::error::LowerError;
use crate::frontend::binder::bind_chain;
use crate::frontend::lambda::LambdaArg;
use crate::frontend::ops::{OpRole, Operation};
use crate::frontend::variable::VarArena;
use crate::util::text;

/// Every method name the chain vocabulary recognizes
pub static CHAIN_METHODS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "empty",
        "of",
        "ofNullable",
        "map",
        "filter",
        "or",
        "flatMap",
        "get",
        "orElse",
        "orElseGet",
        "orElseThrow",
        "ifPresent",
        "ifPresentOrElse",
        "isPresent",
        "isEmpty",
        "stream",
    ])
});

/// Quick membership test a host can use while extracting chains
pub fn is_chain_method(name: &str) -> bool {
    CHAIN_METHODS.contains(name)
}

/// One argument of a call-site descriptor
#[derive(Debug, Clone)]
pub enum CallArg {
    /// A plain expression
    Expr(String),
    /// A function literal
    Lambda(LambdaArg),
    /// A nested chain (the argument of `or` / `flatMap`), with the name
    /// the nested chain is written against
    Chain { bound: String, calls: Vec<CallSite> },
}

/// A call-site descriptor: operation name, arguments, value type
#[derive(Debug, Clone, Default)]
pub struct CallSite {
    pub name: String,
    pub args: Vec<CallArg>,
    /// Host-known type of the unwrapped value after this call
    pub value_ty: Option<String>,
}

impl CallSite {
    /// Start a descriptor for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Append a plain expression argument
    pub fn with_expr(mut self, expr: impl Into<String>) -> Self {
        self.args.push(CallArg::Expr(expr.into()));
        self
    }

    /// Append a function-literal argument
    pub fn with_lambda(mut self, lambda: LambdaArg) -> Self {
        self.args.push(CallArg::Lambda(lambda));
        self
    }

    /// Append a nested-chain argument
    pub fn with_chain(mut self, bound: impl Into<String>, calls: Vec<CallSite>) -> Self {
        self.args.push(CallArg::Chain { bound: bound.into(), calls });
        self
    }

    /// Record the unwrapped value type after this call
    pub fn with_ty(mut self, ty: impl Into<String>) -> Self {
        self.value_ty = Some(ty.into());
        self
    }

    fn arity(&self) -> usize {
        self.args.len()
    }

    fn value_ty_or_var(&self) -> String {
        self.value_ty.clone().unwrap_or_else(|| "var".to_string())
    }
}

/// Resolve whether an expression is a bare reference to a variable
/// already declared in the host scope.
///
/// Used to decide whether a source operation can reuse an existing
/// binding instead of introducing a new declaration.
pub trait VariableResolver {
    fn resolve_variable(&self, expr: &str) -> Option<String>;
}

/// Resolver that never resolves; every source introduces a declaration
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl VariableResolver for NoResolver {
    fn resolve_variable(&self, _expr: &str) -> Option<String> {
        None
    }
}

/// Resolver backed by a set of names known to be in scope
#[derive(Debug, Clone, Default)]
pub struct ScopeResolver {
    names: HashSet<String>,
}

impl ScopeResolver {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }
}

impl VariableResolver for ScopeResolver {
    fn resolve_variable(&self, expr: &str) -> Option<String> {
        let trimmed = expr.trim();
        (text::is_bare_ident(trimmed) && self.names.contains(trimmed))
            .then(|| trimmed.to_string())
    }
}

/// Classify a full chain: one source, any intermediates, one terminal.
pub fn classify_chain(
    calls: &[CallSite],
    arena: &mut VarArena,
    resolver: &dyn VariableResolver,
) -> Result<Vec<Operation>, LowerError> {
    classify_ops(calls, arena, resolver, true)
}

/// Classify a nested sub-chain: one source, any intermediates, no
/// terminal (the sub-chain's value is consumed by the parent).
pub fn classify_subchain(
    calls: &[CallSite],
    arena: &mut VarArena,
    resolver: &dyn VariableResolver,
) -> Result<Vec<Operation>, LowerError> {
    classify_ops(calls, arena, resolver, false)
}

fn classify_ops(
    calls: &[CallSite],
    arena: &mut VarArena,
    resolver: &dyn VariableResolver,
    terminated: bool,
) -> Result<Vec<Operation>, LowerError> {
    if calls.is_empty() {
        return Err(LowerError::shape("empty chain"));
    }
    let mut ops = Vec::with_capacity(calls.len());
    for (index, call) in calls.iter().enumerate() {
        let classified = classify_call(call, arena, resolver)?;
        // an elided identity operation still occupies its position
        let role = classified.as_ref().map(Operation::role).unwrap_or(OpRole::Intermediate);
        match role {
            OpRole::Source if index != 0 => {
                return Err(LowerError::shape(format!("source `{}` after chain start", call.name)));
            }
            OpRole::Intermediate | OpRole::Terminal if index == 0 => {
                return Err(LowerError::shape(format!("chain starts with `{}`", call.name)));
            }
            OpRole::Terminal if index != calls.len() - 1 => {
                return Err(LowerError::shape(format!("terminal `{}` before chain end", call.name)));
            }
            _ => {}
        }
        if let Some(op) = classified {
            ops.push(op);
        }
    }
    let last_role = ops.last().map(Operation::role);
    if terminated && last_role != Some(OpRole::Terminal) {
        return Err(LowerError::shape("chain has no terminal operation"));
    }
    if !terminated && last_role == Some(OpRole::Terminal) {
        return Err(LowerError::shape("nested chain must produce a value, not consume it"));
    }
    Ok(ops)
}

fn classify_call(
    call: &CallSite,
    arena: &mut VarArena,
    resolver: &dyn VariableResolver,
) -> Result<Option<Operation>, LowerError> {
    let unsupported = || LowerError::UnsupportedCall {
        name: call.name.clone(),
        arity: call.arity(),
    };
    let op = match (call.name.as_str(), call.args.as_slice()) {
        ("empty", []) => Operation::Empty { ty: call.value_ty_or_var() },
        ("of", [CallArg::Expr(expr)]) => Operation::Of {
            expr: expr.clone(),
            ty: call.value_ty_or_var(),
            reuse: resolver.resolve_variable(expr),
        },
        ("ofNullable", [CallArg::Expr(expr)]) => Operation::OfNullable {
            expr: expr.clone(),
            ty: call.value_ty_or_var(),
            reuse: resolver.resolve_variable(expr),
        },
        ("map", [CallArg::Lambda(f)]) => {
            expect_arity(f, 1)?;
            if f.try_light_transform().is_some() {
                return Ok(None); // map(x -> x) changes nothing
            }
            Operation::Map { f: f.clone(), ty: call.value_ty_or_var() }
        }
        ("filter", [CallArg::Lambda(pred)]) => {
            expect_arity(pred, 1)?;
            Operation::Filter { pred: pred.clone() }
        }
        ("or", [CallArg::Chain { calls, .. }]) => {
            let sub = classify_subchain(calls, arena, resolver)?;
            Operation::Or { chain: bind_chain(arena, sub) }
        }
        ("or", [CallArg::Lambda(_)]) => {
            return Err(LowerError::lambda("alternative of `or` must be a nested chain"));
        }
        ("flatMap", [CallArg::Chain { bound, calls }]) => {
            if bound.is_empty() {
                return Err(LowerError::lambda("flatMap chain has no bound name"));
            }
            let sub = classify_subchain(calls, arena, resolver)?;
            Operation::FlatMap { chain: bind_chain(arena, sub), bound: bound.clone() }
        }
        ("flatMap", [CallArg::Lambda(_)]) => {
            return Err(LowerError::lambda("body of `flatMap` must be a nested chain"));
        }
        ("get", []) => Operation::Get,
        ("orElse", [CallArg::Expr(expr)]) => Operation::OrElse { expr: expr.clone() },
        ("orElseGet", [CallArg::Lambda(f)]) => {
            expect_arity(f, 0)?;
            Operation::OrElseGet { f: f.clone() }
        }
        ("orElseThrow", []) => Operation::OrElseThrow { f: None },
        ("orElseThrow", [CallArg::Lambda(f)]) => {
            expect_arity(f, 0)?;
            Operation::OrElseThrow { f: Some(f.clone()) }
        }
        ("ifPresent", [CallArg::Lambda(f)]) => {
            expect_arity(f, 1)?;
            Operation::IfPresent { f: f.clone() }
        }
        ("ifPresentOrElse", [CallArg::Lambda(f), CallArg::Lambda(g)]) => {
            expect_arity(f, 1)?;
            expect_arity(g, 0)?;
            Operation::IfPresentOrElse { f: f.clone(), g: g.clone() }
        }
        ("isPresent", []) => Operation::IsPresent,
        ("isEmpty", []) => Operation::IsEmpty,
        ("stream", []) => Operation::Stream,
        _ => return Err(unsupported()),
    };
    Ok(Some(op))
}

fn expect_arity(lambda: &LambdaArg, arity: usize) -> Result<(), LowerError> {
    if lambda.arity() == arity {
        Ok(())
    } else {
        Err(LowerError::lambda(format!(
            "expected a {arity}-parameter function, got {}",
            lambda.arity()
        )))
    }
}
