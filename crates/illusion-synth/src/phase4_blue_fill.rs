//! Phase 4: Blue fill.
//!
//! Tops up blue nodes whose cross-class degree is below `k - k_blue` by
//! pairing consecutive blue nodes in ascending (degree, id) order, cyclically.

use crate::context::SynthesisContext;
use crate::SynthesisPhase;
use illusion_core::Result;

pub struct Phase4BlueFill;

impl SynthesisPhase for Phase4BlueFill {
    fn name(&self) -> &'static str {
        "blue-fill"
    }

    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()> {
        let cap = ctx.degree.saturating_sub(ctx.blue.target_degree);
        ctx.blue.sync(&ctx.graph);
        let order = ctx.blue.sorted_by_edge_count();

        let mut added = 0;
        for (i, &a) in order.iter().enumerate() {
            let b = order[(i + 1) % order.len()];
            if a == b {
                continue;
            }
            if ctx.blue.under(a, cap) && ctx.blue.under(b, cap) && !ctx.graph.has_edge(a, b) {
                ctx.connect(a, b)?;
                added += 1;
            }
        }

        log::debug!("Blue fill: {} edges below cap {}", added, cap);
        Ok(())
    }
}
