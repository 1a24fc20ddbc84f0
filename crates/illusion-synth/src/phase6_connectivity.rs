//! Phase 6: Connectivity repair.
//!
//! Every component gives up one red-red edge `(u, w)`. The freed endpoints
//! are then chained into a cycle, `w_i` to `u_(i+1)`, which merges all
//! components while keeping every degree unchanged.

use crate::context::SynthesisContext;
use crate::SynthesisPhase;
use illusion_core::{IllusionError, NodeId, Result};

pub struct Phase6ConnectivityRepair;

impl Phase6ConnectivityRepair {
    /// First red-red edge of a component, scanning `u` ascending and its red
    /// neighbours `w > u` ascending.
    fn red_pair(ctx: &SynthesisContext, component: &[NodeId]) -> Option<(NodeId, NodeId)> {
        component
            .iter()
            .copied()
            .filter(|&u| ctx.is_red(u))
            .find_map(|u| {
                ctx.graph
                    .neighbors(u)
                    .find(|&w| w > u && ctx.is_red(w))
                    .map(|w| (u, w))
            })
    }
}

impl SynthesisPhase for Phase6ConnectivityRepair {
    fn name(&self) -> &'static str {
        "connectivity-repair"
    }

    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()> {
        let components = ctx.graph.connected_components();
        ctx.components_before_repair = components.len();
        if components.len() <= 1 {
            return Ok(());
        }

        let mut pairs = Vec::with_capacity(components.len());
        for component in &components {
            let pair = Self::red_pair(ctx, component).ok_or_else(|| {
                IllusionError::construction_failed(
                    self.name(),
                    format!(
                        "component containing node {} has no red-red edge to reroute",
                        component[0]
                    ),
                )
            })?;
            pairs.push(pair);
        }

        for &(u, w) in &pairs {
            ctx.disconnect(u, w);
        }
        for (i, &(_, w)) in pairs.iter().enumerate() {
            let (next_u, _) = pairs[(i + 1) % pairs.len()];
            ctx.connect(w, next_u)?;
        }

        log::debug!(
            "Connectivity repair: merged {} components",
            components.len()
        );
        Ok(())
    }
}
