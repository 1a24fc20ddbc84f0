//! Random directed graphs for the search mode.

use illusion_core::{Graph, GraphKind, NodeId, Result};
use rand::seq::index::sample;
use rand::Rng;

/// Random k-out digraph on nodes `0..num_nodes`.
///
/// Every node points at `out_degree` distinct other nodes chosen uniformly,
/// so there are no self-loops or duplicate edges and no node is left without
/// an out-neighbour.
pub fn random_k_out_digraph<R: Rng>(rng: &mut R, num_nodes: usize, out_degree: usize) -> Result<Graph> {
    if out_degree == 0 || out_degree >= num_nodes {
        return Err(illusion_core::IllusionError::invalid_input(format!(
            "out-degree {} needs 1 <= out_degree < {}",
            out_degree, num_nodes
        )));
    }

    let mut graph = Graph::with_nodes(GraphKind::Directed, 0..num_nodes as NodeId);
    for u in 0..num_nodes {
        // Draw from the n - 1 other nodes and shift past u.
        for offset in sample(rng, num_nodes - 1, out_degree).into_iter() {
            let v = if offset >= u { offset + 1 } else { offset };
            graph.add_edge(u as NodeId, v as NodeId)?;
        }
    }
    Ok(graph)
}
