//! Graph-level "1/k illusion" aggregates for plurality and quota illusions.

use crate::plurality::{plurality_at, quota_at, IllusionPair};
use crate::winners::{determine_quota_winners, validate_quota, winners};
use illusion_core::{Coloring, Graph, IllusionError, Result};
use serde::{Deserialize, Serialize};

/// Fraction of deceived nodes compared against `1/k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KFractionIllusion {
    pub k: usize,
    pub strict_fraction: f64,
    pub weak_fraction: f64,
    /// strict fraction > 1/k
    pub strict_over: bool,
    /// strict fraction >= 1/k
    pub strict_at_least: bool,
    /// weak fraction > 1/k
    pub weak_over: bool,
    /// weak fraction >= 1/k
    pub weak_at_least: bool,
}

impl KFractionIllusion {
    /// Compares counts against `total / k` in integer arithmetic.
    pub fn from_counts(strict: usize, weak: usize, total: usize, k: usize) -> Self {
        Self {
            k,
            strict_fraction: strict as f64 / total as f64,
            weak_fraction: weak as f64 / total as f64,
            strict_over: strict * k > total,
            strict_at_least: strict * k >= total,
            weak_over: weak * k > total,
            weak_at_least: weak * k >= total,
        }
    }
}

fn check_shape(graph: &Graph, coloring: &Coloring, k: usize) -> Result<()> {
    if k == 0 {
        return Err(IllusionError::invalid_input("k must be at least 1"));
    }
    if graph.num_nodes() == 0 {
        return Err(IllusionError::invalid_input("graph has no nodes"));
    }
    coloring.validate_for(graph)
}

fn tally(graph: &Graph, pairs: &[IllusionPair], k: usize) -> KFractionIllusion {
    let strict = pairs.iter().filter(|p| p.strict).count();
    let weak = pairs.iter().filter(|p| p.weak).count();
    KFractionIllusion::from_counts(strict, weak, graph.num_nodes(), k)
}

/// Plurality illusion over every node, aggregated against `1/k`.
pub fn plurality_illusion_over_graph(
    graph: &Graph,
    coloring: &Coloring,
    k: usize,
) -> Result<KFractionIllusion> {
    check_shape(graph, coloring, k)?;
    let global = winners(coloring.colors())?;
    let pairs = graph
        .nodes()
        .map(|node| plurality_at(graph, node, coloring, &global))
        .collect::<Result<Vec<_>>>()?;
    let result = tally(graph, &pairs, k);
    log::debug!(
        "Plurality 1/{} illusion: strict {:.3}, weak {:.3}",
        k,
        result.strict_fraction,
        result.weak_fraction
    );
    Ok(result)
}

/// Quota illusion over every node, aggregated against `1/k`.
pub fn quota_illusion_over_graph(
    graph: &Graph,
    coloring: &Coloring,
    quota: f64,
    k: usize,
) -> Result<KFractionIllusion> {
    validate_quota(quota)?;
    check_shape(graph, coloring, k)?;
    let global = determine_quota_winners(&coloring.colors(), quota)?;
    let pairs = graph
        .nodes()
        .map(|node| quota_at(graph, node, coloring, &global, quota))
        .collect::<Result<Vec<_>>>()?;
    let result = tally(graph, &pairs, k);
    log::debug!(
        "Quota({}) 1/{} illusion: strict {:.3}, weak {:.3}",
        quota,
        k,
        result.strict_fraction,
        result.weak_fraction
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use illusion_core::{Color, GraphKind};

    #[test]
    fn test_threshold_boundaries() {
        let exact = KFractionIllusion::from_counts(2, 3, 6, 3);
        assert!(!exact.strict_over);
        assert!(exact.strict_at_least);
        assert!(exact.weak_over);
        assert!(exact.weak_at_least);
        assert!((exact.strict_fraction - 1.0 / 3.0).abs() < 1e-12);

        let below = KFractionIllusion::from_counts(1, 1, 6, 3);
        assert!(!below.strict_at_least && !below.weak_at_least);
    }

    #[test]
    fn test_plurality_over_directed_cycle() {
        // 0 -> 1 -> 2 -> 3 -> 0, colors red, red, red, blue.
        let graph = Graph::from_edges(
            GraphKind::Directed,
            0..4,
            &[(0, 1), (1, 2), (2, 3), (3, 0)],
        )
        .unwrap();
        let coloring = Coloring::from_sequence(
            0..4,
            &[Color::RED, Color::RED, Color::RED, Color::BLUE],
        )
        .unwrap();
        // Only node 2 sees blue: 1 of 4 nodes, strict and weak alike.
        let result = plurality_illusion_over_graph(&graph, &coloring, 4).unwrap();
        assert_eq!(result.strict_fraction, 0.25);
        assert!(!result.strict_over);
        assert!(result.strict_at_least);
        assert!(result.weak_at_least);

        let result = plurality_illusion_over_graph(&graph, &coloring, 2).unwrap();
        assert!(!result.strict_at_least);
    }

    #[test]
    fn test_quota_over_graph() {
        let graph = Graph::from_edges(
            GraphKind::Directed,
            0..4,
            &[(0, 3), (1, 3), (2, 0), (3, 0)],
        )
        .unwrap();
        let coloring = Coloring::from_sequence(
            0..4,
            &[Color::RED, Color::RED, Color::RED, Color::BLUE],
        )
        .unwrap();
        // Nodes 0 and 1 see only blue against a red quota winner.
        let result = quota_illusion_over_graph(&graph, &coloring, 0.5, 2).unwrap();
        assert_eq!(result.strict_fraction, 0.5);
        assert!(result.strict_at_least);
        assert!(!result.strict_over);
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        let graph = Graph::with_nodes(GraphKind::Directed, 0..2);
        let coloring = Coloring::from_sequence(0..2, &[Color::RED, Color::BLUE]).unwrap();
        assert!(plurality_illusion_over_graph(&graph, &coloring, 0).is_err());
        assert!(quota_illusion_over_graph(&graph, &coloring, 0.0, 2).is_err());

        let empty = Graph::new(GraphKind::Directed);
        assert!(plurality_illusion_over_graph(&empty, &Coloring::new(), 2).is_err());
    }
}
