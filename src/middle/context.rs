//! Generation context
//!
//! Mutable-but-scoped state accumulated while generating code for one
//! chain: hoisted before/after steps, the current absent-path escape, the
//! pending initializer expression, and naming bookkeeping. A context
//! lives for exactly one lowering attempt.

use indexmap::IndexSet;

use crate::frontend::variable::{VarArena, VarId};
use crate::util::config::LowerConfig;

/// Single-assignment cell; writing twice is a programming error, not a
/// recoverable failure.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    value: Option<T>,
    what: &'static str,
}

impl<T> Slot<T> {
    pub fn new(what: &'static str) -> Self {
        Self { value: None, what }
    }

    #[track_caller]
    pub fn set(&mut self, value: T) {
        assert!(self.value.is_none(), "{} already set", self.what);
        self.value = Some(value);
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// How the chain's result is re-embedded into the surrounding statement
#[derive(Debug, Clone)]
pub enum ChainExprModel {
    /// The chain is the sole expression of a `return`
    Return,
    /// Right side of an assignment to a non-final local
    Assign { target: String },
    /// Initializer of a declaration
    Declare { ty: String, name: String },
    /// A bare expression statement
    Statement,
}

impl ChainExprModel {
    /// Assignment model shorthand
    pub fn assign(target: impl Into<String>) -> Self {
        ChainExprModel::Assign { target: target.into() }
    }

    /// Declaration model shorthand
    pub fn declare(ty: impl Into<String>, name: impl Into<String>) -> Self {
        ChainExprModel::Declare { ty: ty.into(), name: name.into() }
    }

    /// Embed the pipeline's result expression into a statement
    pub fn embed(&self, expr: &str) -> String {
        match self {
            ChainExprModel::Return => format!("return {expr};"),
            ChainExprModel::Assign { target } => format!("{target} = {expr};"),
            ChainExprModel::Declare { name, .. } => format!("{name} = {expr};"),
            ChainExprModel::Statement => format!("{expr};"),
        }
    }

    /// Does embedding exit the enclosing function?
    pub fn is_exiting(&self) -> bool {
        matches!(self, ChainExprModel::Return)
    }

    /// Name of the binding the result flows into, if any
    pub fn target_name(&self) -> Option<&str> {
        match self {
            ChainExprModel::Assign { target } => Some(target),
            ChainExprModel::Declare { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Statement text to run when the chain goes absent
#[derive(Debug, Clone)]
pub struct Escape {
    pub text: String,
    /// `throw`/`return`: control never reaches the code after the guard
    pub exiting: bool,
}

impl Escape {
    pub fn exiting(text: impl Into<String>) -> Self {
        Self { text: text.into(), exiting: true }
    }

    pub fn fallthrough(text: impl Into<String>) -> Self {
        Self { text: text.into(), exiting: false }
    }
}

/// Per-lowering generation state
#[derive(Debug)]
pub struct GenContext<'a> {
    pub arena: VarArena,
    pub model: ChainExprModel,
    pub config: &'a LowerConfig,
    /// Names unavailable for generated variables
    pub reserved: IndexSet<String>,
    before_steps: Vec<String>,
    after_steps: Vec<String>,
    else_branch: Option<Escape>,
    initializer: Slot<String>,
    initializer_consumed: bool,
}

impl<'a> GenContext<'a> {
    pub fn new(
        mut arena: VarArena,
        model: ChainExprModel,
        taken_names: &[&str],
        config: &'a LowerConfig,
    ) -> Self {
        let mut reserved: IndexSet<String> =
            taken_names.iter().map(|name| name.to_string()).collect();
        if let Some(target) = model.target_name() {
            // the result binding participates in instruction identity
            let ty = match &model {
                ChainExprModel::Declare { ty, .. } => ty.clone(),
                _ => "var".to_string(),
            };
            let id = arena.alloc(ty);
            let slot = arena.get_mut(id);
            slot.name = Some(target.to_string());
            slot.registered = true;
            slot.reuse_existing = true;
            reserved.insert(target.to_string());
        }
        Self {
            arena,
            model,
            config,
            reserved,
            before_steps: Vec::new(),
            after_steps: Vec::new(),
            else_branch: None,
            initializer: Slot::new("initializer"),
            initializer_consumed: false,
        }
    }

    /// Embed the result expression through the chain-expression model
    pub fn embed(&self, expr: &str) -> String {
        self.model.embed(expr)
    }

    /// Record the absent-path default expression (single-assignment)
    #[track_caller]
    pub fn set_initializer(&mut self, expr: impl Into<String>) {
        self.initializer.set(expr.into());
    }

    /// Install the absent-path escape for the current scope
    /// (single-assignment per scope)
    #[track_caller]
    pub fn set_else_branch(&mut self, escape: Escape) {
        assert!(self.else_branch.is_none(), "else branch already set in this scope");
        self.else_branch = Some(escape);
    }

    /// Open a fresh escape scope (entering an `Or` region)
    pub fn reset_else_scope(&mut self) {
        self.else_branch = None;
    }

    pub fn has_else_branch(&self) -> bool {
        self.else_branch.is_some()
    }

    /// Is any escape available to a guard right now?
    pub fn escape_available(&self, allow_initializer: bool) -> bool {
        self.else_branch.is_some() || (allow_initializer && self.initializer.is_set())
    }

    /// The current absent-path escape: the scoped else branch if set,
    /// otherwise the initializer re-embedded as a default (marking it
    /// consumed so it is not also prepended).
    fn escape_for_guard(&mut self, allow_initializer: bool) -> Option<Escape> {
        if let Some(escape) = &self.else_branch {
            return Some(escape.clone());
        }
        if allow_initializer {
            if let Some(init) = self.initializer.get() {
                let text = self.model.embed(init);
                self.initializer_consumed = true;
                return Some(Escape { text, exiting: self.model.is_exiting() });
            }
        }
        None
    }

    /// Wrap a continuation in a presence guard.
    ///
    /// An exiting escape inverts the guard and leaves the continuation
    /// unguarded; a fall-through escape becomes the else branch; with no
    /// escape the continuation is simply guarded.
    pub fn wrap_guard(
        &mut self,
        present: &str,
        absent: &str,
        code: &str,
        allow_initializer: bool,
    ) -> String {
        match self.escape_for_guard(allow_initializer) {
            Some(escape) if escape.exiting => {
                let guard = format!("if ({absent}) {{\n{}\n}}", escape.text);
                if code.is_empty() {
                    guard
                } else {
                    format!("{guard}\n{code}")
                }
            }
            Some(escape) => {
                format!("if ({present}) {{\n{code}\n}} else {{\n{}\n}}", escape.text)
            }
            None => format!("if ({present}) {{\n{code}\n}}"),
        }
    }

    /// Hoist a statement before the guarded region
    pub fn before_step(&mut self, stmt: impl Into<String>) {
        self.before_steps.push(stmt.into());
    }

    /// Defer a statement after the guarded region
    pub fn after_step(&mut self, stmt: impl Into<String>) {
        self.after_steps.push(stmt.into());
    }

    /// Require a variable's declaration to be hoisted before the guarded
    /// region (so after-steps can see it). Reused and statically absent
    /// bindings need no hoisting.
    pub fn mark_hoisted(&mut self, id: VarId) {
        let data = self.arena.get_mut(id);
        if !data.reuse_existing && !data.known_absent {
            data.hoisted = true;
        }
    }

    pub fn is_hoisted(&self, id: VarId) -> bool {
        self.arena.get(id).hoisted
    }

    /// The result-binding prelude plus hoisted steps around the body.
    pub fn assemble(&self, body: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let prelude = self.prelude();
        if let Some(prelude) = &prelude {
            parts.push(prelude);
        }
        for step in &self.before_steps {
            parts.push(step);
        }
        if !body.is_empty() {
            parts.push(body);
        }
        for step in &self.after_steps {
            parts.push(step);
        }
        parts.join("\n")
    }

    /// The statement prepended before the block: the result declaration
    /// and/or the unconsumed initializer default.
    fn prelude(&self) -> Option<String> {
        let pending_init =
            (!self.initializer_consumed).then(|| self.initializer.get()).flatten();
        match &self.model {
            ChainExprModel::Declare { ty, name } => Some(match pending_init {
                Some(init) => format!("{ty} {name} = {init};"),
                None => format!("{ty} {name};"),
            }),
            _ => pending_init.map(|init| self.model.embed(init)),
        }
    }
}
