//! Lowering configuration
//!
//! A host configures formatting of the rendered output and which
//! simplification passes run. Everything defaults to the behavior of the
//! original transformation; the knobs exist for hosts that want more or
//! less aggressive cleanup.

use serde::{Deserialize, Serialize};

/// Top-level configuration for one lowering attempt
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LowerConfig {
    /// Output formatting
    #[serde(default)]
    pub fmt: FmtConfig,
    /// Simplification pipeline
    #[serde(default)]
    pub simplify: SimplifyConfig,
}

impl LowerConfig {
    /// Development configuration: per-pass statistics are logged
    pub fn development() -> Self {
        Self {
            fmt: FmtConfig::default(),
            simplify: SimplifyConfig::development(),
        }
    }

    /// Release configuration
    pub fn release() -> Self {
        Self::default()
    }
}

/// Formatting of the rendered statement block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FmtConfig {
    /// Spaces per indentation level
    #[serde(default = "default_indent")]
    pub indent_width: usize,
    /// Render a single-statement then-branch on one line, without braces
    #[serde(default = "default_true")]
    pub inline_single_then: bool,
    /// Fold `if (c) x = a; else x = b;` into a conditional expression
    #[serde(default = "default_true")]
    pub fold_conditional_assignments: bool,
}

impl Default for FmtConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            inline_single_then: true,
            fold_conditional_assignments: true,
        }
    }
}

/// Which simplification passes run, and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifyConfig {
    /// Master switch for the whole pipeline
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Pass 1: drop dead or empty else-less checks
    #[serde(default = "default_true")]
    pub remove_checks: bool,
    /// Pass 2: merge nested and sibling checks
    #[serde(default = "default_true")]
    pub merge_checks: bool,
    /// Pass 3: drop unreachable statements after return/throw
    #[serde(default = "default_true")]
    pub remove_after_exit: bool,
    /// Pass 4: eliminate temporaries feeding an immediate return
    #[serde(default = "default_true")]
    pub merge_return: bool,
    /// Pass 5: fold a declaration with its immediate reassignment
    #[serde(default = "default_true")]
    pub merge_assignment: bool,
    /// Iterate the pipeline to a fixpoint instead of one fixed round.
    ///
    /// Off by default: one round in fixed order reproduces the original
    /// transformation's output. Turning this on can catch cross-pass
    /// opportunities at the cost of diverging from that output.
    #[serde(default)]
    pub fixpoint: bool,
    /// Log per-pass statistics at debug level
    #[serde(default)]
    pub print_stats: bool,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_checks: true,
            merge_checks: true,
            remove_after_exit: true,
            merge_return: true,
            merge_assignment: true,
            fixpoint: false,
            print_stats: false,
        }
    }
}

impl SimplifyConfig {
    /// Development configuration: statistics on
    pub fn development() -> Self {
        Self { print_stats: true, ..Self::default() }
    }

    /// Disable every pass (render the raw generated shape)
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }
}

fn default_indent() -> usize {
    4
}

fn default_true() -> bool {
    true
}
