//! Phase 7: Verification.

use crate::context::SynthesisContext;
use crate::SynthesisPhase;
use illusion_core::{IllusionError, Result};

/// Rejects any graph that is not exactly k-regular and connected.
pub struct Phase7Verification;

impl SynthesisPhase for Phase7Verification {
    fn name(&self) -> &'static str {
        "verification"
    }

    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()> {
        let k = ctx.degree;
        let stats = ctx.graph.stats();

        if let Some(node) = ctx.graph.nodes().find(|&v| ctx.degree_of(v) != k) {
            return Err(IllusionError::construction_failed(
                self.name(),
                format!(
                    "node {} has degree {} instead of {} (degrees range {}..={})",
                    node,
                    ctx.degree_of(node),
                    k,
                    stats.min_degree,
                    stats.max_degree
                ),
            ));
        }
        if stats.components != 1 {
            return Err(IllusionError::construction_failed(
                self.name(),
                format!("graph has {} connected components", stats.components),
            ));
        }
        Ok(())
    }
}
