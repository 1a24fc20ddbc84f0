//! Phase 5: Intra-class subgraphs.
//!
//! Gives each class a circulant subgraph of degree `k_red` (red) or `k_blue`
//! (blue): a perfect matching across the class when the degree is odd,
//! then `d/2` rings of increasing stride. A class whose size times target is
//! odd cannot be regular, so it is built one degree short and the missing
//! slots are filled by the odd correction afterwards.

use crate::context::SynthesisContext;
use crate::SynthesisPhase;
use illusion_core::{ColorClass, IllusionError, NodeId, Result};

pub struct Phase5IntraClass;

impl Phase5IntraClass {
    /// Builds the circulant on one class. Returns whether the class came up short.
    ///
    /// Only a class whose `size * target` is odd is built one degree short;
    /// the other class always gets its full circulant.
    fn build_class(&self, ctx: &mut SynthesisContext, class: &ColorClass) -> Result<bool> {
        let target = class.target_degree;
        if target == 0 {
            return Ok(false);
        }
        let size = class.len();
        if target >= size {
            return Err(IllusionError::construction_failed(
                self.name(),
                format!(
                    "{} class has {} nodes, too few for intra-class degree {}",
                    class.color, size, target
                ),
            ));
        }

        let short = (size * target) % 2 == 1;
        let build = if short { target - 1 } else { target };
        let members = &class.members;

        if build % 2 == 1 && size % 2 == 0 {
            let half = size / 2;
            for i in 0..half {
                connect_once(ctx, members[i], members[i + half])?;
            }
        }
        for i in 0..size {
            for stride in 1..=build / 2 {
                connect_once(ctx, members[i], members[(i + stride) % size])?;
            }
        }
        Ok(short)
    }

    /// Bridges one blue and one red node left short, then pairs up any
    /// remaining deficient nodes in ascending id order.
    fn correct_odd_deficit(&self, ctx: &mut SynthesisContext) -> Result<()> {
        let k = ctx.degree;
        let lowest = |ctx: &SynthesisContext, nodes: &[NodeId], partner: Option<NodeId>| {
            nodes
                .iter()
                .copied()
                .filter(|&v| ctx.degree_of(v) < k)
                .filter(|&v| partner.map_or(true, |p| !ctx.graph.has_edge(p, v)))
                .min_by_key(|&v| (ctx.degree_of(v), v))
        };

        let blue_end = lowest(&*ctx, &ctx.blue.members, None);
        let red_end = blue_end.and_then(|b| lowest(&*ctx, &ctx.red.members, Some(b)));
        if let (Some(b), Some(r)) = (blue_end, red_end) {
            ctx.connect(b, r)?;
            log::debug!("Odd correction: bridged blue {} to red {}", b, r);
        }

        let nodes: Vec<NodeId> = ctx.graph.nodes().collect();
        for &u in &nodes {
            while ctx.degree_of(u) < k {
                let partner = nodes.iter().copied().find(|&w| {
                    w != u && ctx.degree_of(w) < k && !ctx.graph.has_edge(u, w)
                });
                match partner {
                    Some(w) => {
                        ctx.connect(u, w)?;
                    }
                    None => break,
                }
            }
        }
        Ok(())
    }
}

fn connect_once(ctx: &mut SynthesisContext, u: NodeId, v: NodeId) -> Result<()> {
    if !ctx.graph.has_edge(u, v) {
        ctx.connect(u, v)?;
    }
    Ok(())
}

impl SynthesisPhase for Phase5IntraClass {
    fn name(&self) -> &'static str {
        "intra-class"
    }

    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()> {
        let red = ctx.red.clone();
        let blue = ctx.blue.clone();
        let mut short = self.build_class(ctx, &red)?;
        short |= self.build_class(ctx, &blue)?;

        ctx.odd_deficit = short;
        if short {
            self.correct_odd_deficit(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase1_partition::Phase1Partition;
    use crate::phase2_degree_split::Phase2DegreeSplit;

    fn classes_only(n: usize, k: usize) -> SynthesisContext {
        let mut ctx = SynthesisContext::new(n, k);
        Phase1Partition.execute(&mut ctx).unwrap();
        Phase2DegreeSplit.execute(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn test_matching_for_odd_target() {
        // 8 red nodes with k_red = 1: a perfect matching i <-> i + 4.
        let mut ctx = classes_only(14, 4);
        Phase5IntraClass.execute(&mut ctx).unwrap();
        assert!(!ctx.odd_deficit);
        assert_eq!(ctx.graph.num_edges(), 4);
        assert!(ctx.graph.has_edge(1, 5));
        assert!(ctx.graph.has_edge(4, 8));
    }

    #[test]
    fn test_rings_for_even_target() {
        // 9 red nodes and k_red = 2 form a single ring.
        let mut ctx = classes_only(16, 5);
        ctx.blue.target_degree = 0;
        Phase5IntraClass.execute(&mut ctx).unwrap();
        assert_eq!(ctx.red.target_degree, 2);
        assert_eq!(ctx.graph.num_edges(), 9);
        for &r in &ctx.red.members {
            assert_eq!(ctx.degree_of(r), 2);
        }
        assert!(ctx.graph.has_edge(9, 1));
    }

    #[test]
    fn test_odd_class_triggers_correction() {
        // 5 red nodes with k_red = 1 cannot be matched.
        let mut ctx = classes_only(9, 4);
        assert_eq!(ctx.red.target_degree, 1);
        Phase5IntraClass.execute(&mut ctx).unwrap();
        assert!(ctx.odd_deficit);
        // With no prior edges the correction pairs nodes up to degree 4.
        for node in ctx.graph.nodes() {
            assert!(ctx.degree_of(node) <= 4);
        }
        assert!(ctx.graph.num_edges() > 0);
    }

    #[test]
    fn test_only_the_odd_class_is_built_short() {
        // 13 nodes, k = 8: 7 red at k_red = 3 (odd product), 6 blue at k_blue = 2.
        let mut ctx = classes_only(13, 8);
        let (red, blue) = (ctx.red.clone(), ctx.blue.clone());
        assert_eq!((red.target_degree, blue.target_degree), (3, 2));

        assert!(Phase5IntraClass.build_class(&mut ctx, &red).unwrap());
        assert!(!Phase5IntraClass.build_class(&mut ctx, &blue).unwrap());

        for &r in &red.members {
            assert_eq!(ctx.degree_of(r), 2);
        }
        for &b in &blue.members {
            assert_eq!(ctx.degree_of(b), 2);
        }
        assert!(ctx.graph.has_edge(8, 9));
        assert!(ctx.graph.has_edge(13, 8));
        assert_eq!(ctx.graph.num_edges(), 13);
    }

    #[test]
    fn test_target_too_large_for_class() {
        let mut ctx = classes_only(9, 4);
        ctx.blue.target_degree = 4;
        let err = Phase5IntraClass.execute(&mut ctx).unwrap_err();
        assert_eq!(err.phase(), Some("intra-class"));
    }
}
