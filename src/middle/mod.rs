//! Lowering middle end
//!
//! Generation context, code generator, instruction IR, the simplifier
//! pipeline, and final rendering.

pub mod codegen;
pub mod context;
pub mod ir;
pub mod passes;
pub mod render;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::error::LowerError;
use crate::frontend::ops::Operation;
use crate::frontend::variable::VarArena;
use crate::middle::context::{ChainExprModel, GenContext};
use crate::util::config::LowerConfig;

/// The finished replacement: a block of statement text meant to replace
/// the chain's enclosing statement verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lowered {
    pub body: String,
}

/// Generate, ingest, simplify and render one chain.
pub fn lower(
    ops: Vec<Operation>,
    model: ChainExprModel,
    arena: VarArena,
    taken_names: &[&str],
    config: &LowerConfig,
) -> Result<Lowered, LowerError> {
    let mut ctx = GenContext::new(arena, model, taken_names, config);
    let generated = codegen::generate_code(&mut ctx, ops)?;
    debug!("generated {} byte(s) of raw statements", generated.len());
    let instructions = ir::ingest_block(&generated, &ctx.arena);
    let (instructions, stats) = passes::Pipeline::new(&config.simplify).run(instructions);
    debug!("simplification made {} rewrite(s)", stats.total());
    Ok(Lowered { body: render::render_block(&instructions, &config.fmt) })
}
