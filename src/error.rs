//! Abort signal for unsupported constructs
//!
//! Every stage of the lowering (classification, generation) reports the
//! same kind of failure: a shape it cannot model. The error aborts the
//! whole attempt; the host leaves the original code untouched.

use thiserror::Error;

/// Lowering abort
///
/// There is no retry and no recovery path. Either a complete, correct
/// replacement is produced, or nothing is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LowerError {
    /// A call that does not belong to the recognized chain vocabulary
    #[error("unsupported call in chain: {name} with {arity} argument(s)")]
    UnsupportedCall { name: String, arity: usize },

    /// A function argument whose shape the lowering cannot substitute into
    #[error("unsupported function argument: {reason}")]
    UnsupportedLambda { reason: String },

    /// A chain whose overall structure is not source → intermediates → terminal
    #[error("unsupported chain shape: {what}")]
    UnsupportedShape { what: String },
}

impl LowerError {
    /// Shorthand for an unsupported lambda abort
    pub fn lambda(reason: impl Into<String>) -> Self {
        LowerError::UnsupportedLambda { reason: reason.into() }
    }

    /// Shorthand for an unsupported chain-shape abort
    pub fn shape(what: impl Into<String>) -> Self {
        LowerError::UnsupportedShape { what: what.into() }
    }
}
