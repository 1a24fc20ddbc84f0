//! Phase 3: Bipartite wiring.
//!
//! Wires red nodes to blue nodes round-robin. Red nodes are visited cyclically
//! and blue nodes cyclically with a running offset; whenever the candidate
//! edge already exists the offset moves one step and stays there.

use crate::context::SynthesisContext;
use crate::SynthesisPhase;
use illusion_core::{IllusionError, Result};

/// Number of red-blue edges to lay down for `red_size` red nodes of degree `k`.
pub fn bipartite_edge_count(red_size: usize, k: usize) -> usize {
    if k % 2 == 0 {
        red_size * (k + 2) / 2
    } else {
        red_size * (k + 1) / 2
    }
}

pub struct Phase3BipartiteWiring;

impl SynthesisPhase for Phase3BipartiteWiring {
    fn name(&self) -> &'static str {
        "bipartite-wiring"
    }

    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()> {
        let red = ctx.red.members.clone();
        let blue = ctx.blue.members.clone();
        if red.is_empty() || blue.is_empty() {
            return Err(IllusionError::construction_failed(
                self.name(),
                "both color classes need at least one node",
            ));
        }

        let edges = bipartite_edge_count(red.len(), ctx.degree);
        let mut offset = 0;
        for i in 0..edges {
            let r = red[i % red.len()];
            let mut b = blue[(i + offset) % blue.len()];
            if ctx.graph.has_edge(r, b) {
                offset += 1;
                b = blue[(i + offset) % blue.len()];
                if ctx.graph.has_edge(r, b) {
                    return Err(IllusionError::construction_failed(
                        self.name(),
                        format!("red node {} has no free blue partner at step {}", r, i),
                    ));
                }
            }
            ctx.connect(r, b)?;
        }

        log::debug!(
            "Bipartite wiring: {} red-blue edges, final offset {}",
            edges,
            offset
        );
        Ok(())
    }
}
