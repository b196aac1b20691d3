//! Chain model
//!
//! This module contains the input surface of the lowering: call-site
//! descriptors handed over by the host, their classification into
//! operations, the chain variables threaded between operations, and the
//! binder producing operation records.

pub mod binder;
pub mod calls;
pub mod lambda;
pub mod ops;
pub mod variable;

pub use binder::{bind_chain, OperationRecord};
pub use calls::{classify_chain, CallArg, CallSite, NoResolver, VariableResolver};
pub use lambda::LambdaArg;
pub use ops::{OpRole, Operation};
pub use variable::{VarArena, VarId};
