//! Phase 2: Degree split.
//!
//! Chooses the intra-class degrees `k_red` and `k_blue`. Each red node keeps
//! `k - k_red` slots for blue neighbours, so red nodes mostly see blue while
//! blue nodes mostly see blue among themselves.

use crate::context::SynthesisContext;
use crate::SynthesisPhase;
use illusion_core::Result;

/// Intra-class degrees `(k_blue, k_red)` for `n` nodes of degree `k`.
///
/// Negative targets clamp to zero, which skips that intra-class subgraph.
pub fn intra_class_degrees(n: usize, k: usize) -> (usize, usize) {
    let k = k as i64;
    let (k_blue, k_red) = match (n % 2 == 0, k % 2 == 0) {
        (true, true) => (k / 2 - 3, k / 2 - 1),
        (true, false) => ((k - 5) / 2, (k - 1) / 2),
        (false, _) => (k / 2 - 2, (k - 2) / 2),
    };
    (k_blue.max(0) as usize, k_red.max(0) as usize)
}

pub struct Phase2DegreeSplit;

impl SynthesisPhase for Phase2DegreeSplit {
    fn name(&self) -> &'static str {
        "degree-split"
    }

    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()> {
        let (k_blue, k_red) = intra_class_degrees(ctx.num_nodes, ctx.degree);
        ctx.red.target_degree = k_red;
        ctx.blue.target_degree = k_blue;
        log::debug!("Degree split: k_red = {}, k_blue = {}", k_red, k_blue);
        Ok(())
    }
}
