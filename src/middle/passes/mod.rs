//! Simplifier pipeline
//!
//! Five ordered, independently-specified tree-rewrite passes over
//! instruction lists. The pipeline runs each pass exactly once, in fixed
//! order — not to a fixpoint — yet running it twice on its own output
//! changes nothing.
//!
//! Only else-less checks are restructured; a check with an else branch is
//! inert to every pass.

pub mod merge_assignment;
pub mod merge_checks;
pub mod merge_return;
pub mod remove_after_exit;
pub mod remove_checks;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::middle::ir::Instruction;
use crate::util::config::SimplifyConfig;

/// Per-pass rewrite counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    /// Dead checks deleted (empty body or always-false condition)
    pub removed_checks: usize,
    /// Always-true checks replaced by their body
    pub spliced_checks: usize,
    /// Nested checks collapsed with `&&`
    pub merged_conditions: usize,
    /// Sibling throw-checks merged with `||`
    pub merged_throws: usize,
    /// Unreachable statements dropped after return/throw
    pub dropped_unreachable: usize,
    /// Temporaries folded into an immediate return
    pub merged_returns: usize,
    /// Declarations folded with their immediate reassignment
    pub merged_assignments: usize,
}

impl SimplifyStats {
    /// Total number of rewrites across all passes
    pub fn total(&self) -> usize {
        self.removed_checks
            + self.spliced_checks
            + self.merged_conditions
            + self.merged_throws
            + self.dropped_unreachable
            + self.merged_returns
            + self.merged_assignments
    }
}

/// Fixed-order pass driver
#[derive(Debug)]
pub struct Pipeline<'a> {
    config: &'a SimplifyConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a SimplifyConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline once (or to a fixpoint, when configured).
    pub fn run(&self, instructions: Vec<Instruction>) -> (Vec<Instruction>, SimplifyStats) {
        let mut stats = SimplifyStats::default();
        if !self.config.enabled {
            return (instructions, stats);
        }
        let mut current = self.run_once(instructions, &mut stats);
        if self.config.fixpoint {
            loop {
                let mut round = SimplifyStats::default();
                let next = self.run_once(current.clone(), &mut round);
                if next == current {
                    break;
                }
                stats = merge_stats(stats, round);
                current = next;
            }
        }
        if self.config.print_stats {
            debug!(?stats, "simplification finished with {} rewrite(s)", stats.total());
        }
        (current, stats)
    }

    fn run_once(
        &self,
        mut list: Vec<Instruction>,
        stats: &mut SimplifyStats,
    ) -> Vec<Instruction> {
        if self.config.remove_checks {
            list = remove_checks::run(list, stats);
        }
        if self.config.merge_checks {
            list = merge_checks::run(list, stats);
        }
        if self.config.remove_after_exit {
            list = remove_after_exit::run(list, stats);
        }
        if self.config.merge_return {
            list = merge_return::run(list, stats);
        }
        if self.config.merge_assignment {
            list = merge_assignment::run(list, stats);
        }
        list
    }
}

fn merge_stats(a: SimplifyStats, b: SimplifyStats) -> SimplifyStats {
    SimplifyStats {
        removed_checks: a.removed_checks + b.removed_checks,
        spliced_checks: a.spliced_checks + b.spliced_checks,
        merged_conditions: a.merged_conditions + b.merged_conditions,
        merged_throws: a.merged_throws + b.merged_throws,
        dropped_unreachable: a.dropped_unreachable + b.dropped_unreachable,
        merged_returns: a.merged_returns + b.merged_returns,
        merged_assignments: a.merged_assignments + b.merged_assignments,
    }
}
