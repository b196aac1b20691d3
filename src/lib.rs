//! unchain
//!
//! Lowers a fluent chain of operations over an optional (possibly-absent)
//! value into an equivalent tree of imperative control-flow statements,
//! then runs a fixed pipeline of peephole rewrites over that tree to
//! minimize the generated code.
//!
//! # Example
//!
//! ```
//! use unchain::{lower_chain, CallSite, ChainExprModel, LowerConfig, NoResolver};
//!
//! let calls = [
//!     CallSite::new("ofNullable").with_expr("user.getName()").with_ty("String"),
//!     CallSite::new("orElse").with_expr("\"anonymous\""),
//! ];
//! let lowered = lower_chain(
//!     &calls,
//!     ChainExprModel::assign("name"),
//!     &NoResolver,
//!     &LowerConfig::default(),
//! ).unwrap();
//! assert!(lowered.body.contains("name = (value != null) ? value : \"anonymous\";"));
//! ```

#![doc(html_root_url = "https://docs.rs/unchain")]
#![warn(rust_2018_idioms)]
#![allow(dead_code)]

// Public modules
pub mod error;
pub mod frontend;
pub mod middle;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

pub use error::LowerError;
pub use frontend::calls::{CallArg, CallSite, NoResolver, VariableResolver};
pub use frontend::lambda::LambdaArg;
pub use frontend::variable::{VarArena, VarId};
pub use middle::context::ChainExprModel;
pub use middle::Lowered;
pub use util::config::{FmtConfig, LowerConfig, SimplifyConfig};

use tracing::debug;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lower a whole call chain in one step.
///
/// Classifies the call-site descriptors into operations, threads chain
/// variables through them, generates guarded statements, simplifies the
/// result and renders it back to text. Any construct the lowering cannot
/// model aborts the attempt; no partial output is ever produced.
pub fn lower_chain(
    calls: &[CallSite],
    model: ChainExprModel,
    resolver: &dyn VariableResolver,
    config: &LowerConfig,
) -> std::result::Result<Lowered, LowerError> {
    lower_chain_in_scope(calls, model, resolver, &[], config)
}

/// Like [`lower_chain`], with a set of names already taken in the host
/// scope; generated variable names will avoid them.
pub fn lower_chain_in_scope(
    calls: &[CallSite],
    model: ChainExprModel,
    resolver: &dyn VariableResolver,
    taken_names: &[&str],
    config: &LowerConfig,
) -> std::result::Result<Lowered, LowerError> {
    debug!("lowering chain of {} calls", calls.len());
    let mut arena = VarArena::new();
    let ops = frontend::calls::classify_chain(calls, &mut arena, resolver)?;
    middle::lower(ops, model, arena, taken_names, config)
}
