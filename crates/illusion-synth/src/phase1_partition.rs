//! Phase 1: Partition.
//!
//! Creates nodes `1..=n` and splits them into a red majority of `n/2 + 1`
//! nodes and a blue minority holding the rest.

use crate::context::SynthesisContext;
use crate::SynthesisPhase;
use illusion_core::{Color, ColorClass, Graph, GraphKind, IllusionError, NodeId, Result};

pub struct Phase1Partition;

impl SynthesisPhase for Phase1Partition {
    fn name(&self) -> &'static str {
        "partition"
    }

    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()> {
        let (n, k) = (ctx.num_nodes, ctx.degree);
        let n = NodeId::try_from(n)
            .map_err(|_| IllusionError::invalid_input(format!("{} nodes exceed the id range", n)))?;

        // n*k is odd exactly when both factors are.
        if n % 2 == 1 && k % 2 == 1 {
            return Err(IllusionError::construction_failed(
                self.name(),
                format!("no {}-regular graph on {} nodes exists (n*k is odd)", k, n),
            ));
        }

        let red_size = n / 2 + 1;
        ctx.graph = Graph::with_nodes(GraphKind::Undirected, 1..=n);
        ctx.red = ColorClass::new(Color::RED, (1..=red_size).collect());
        ctx.blue = ColorClass::new(Color::BLUE, (red_size + 1..=n).collect());

        log::debug!(
            "Partition: {} red, {} blue",
            ctx.red.len(),
            ctx.blue.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_majority() {
        let mut ctx = SynthesisContext::new(14, 4);
        Phase1Partition.execute(&mut ctx).unwrap();
        assert_eq!(ctx.graph.num_nodes(), 14);
        assert_eq!(ctx.red.members, (1..=8).collect::<Vec<_>>());
        assert_eq!(ctx.blue.members, (9..=14).collect::<Vec<_>>());

        let mut ctx = SynthesisContext::new(9, 4);
        Phase1Partition.execute(&mut ctx).unwrap();
        assert_eq!(ctx.red.len(), 5);
        assert_eq!(ctx.blue.len(), 4);
    }

    #[test]
    fn test_odd_degree_sum_fails() {
        let mut ctx = SynthesisContext::new(7, 3);
        let err = Phase1Partition.execute(&mut ctx).unwrap_err();
        assert_eq!(err.phase(), Some("partition"));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_node_count_beyond_id_range() {
        for (n, k) in [(usize::MAX, usize::MAX - 1), (usize::MAX, usize::MAX - 2)] {
            let mut ctx = SynthesisContext::new(n, k);
            let err = Phase1Partition.execute(&mut ctx).unwrap_err();
            assert!(matches!(err, IllusionError::InvalidInput(_)));
            assert_eq!(ctx.graph.num_nodes(), 0);
        }
    }
}
