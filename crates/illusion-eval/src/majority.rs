//! Majority illusion on a binary palette.
//!
//! A node is under majority illusion when the majority color among its
//! out-neighbours differs from the global majority color. Nodes without
//! out-neighbours are never under illusion.

use crate::winners::{neighbor_colors, winners, WinnerSet};
use illusion_core::{Color, Coloring, Graph, IllusionError, NodeId, Result};
use serde::{Deserialize, Serialize};

/// Illusion status of a node, or of a whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    NoIllusion,
    Illusion,
    /// A tied winner set decided the outcome
    Tie,
}

/// Per-node and graph-level majority illusion results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityReport {
    /// `(node, under illusion)` in ascending node order
    pub node_verdicts: Vec<(NodeId, bool)>,
    pub illusion_count: usize,
    /// Winner of the vote over node verdicts
    pub verdict: Verdict,
}

impl MajorityReport {
    /// Majority-majority illusion holds. A tied vote counts as no illusion.
    pub fn has_illusion(&self) -> bool {
        self.verdict == Verdict::Illusion
    }
}

fn global_winners(coloring: &Coloring) -> Result<WinnerSet<Color>> {
    winners(coloring.iter().map(|(_, color)| color))
}

fn majority_at(
    graph: &Graph,
    node: NodeId,
    coloring: &Coloring,
    global: &WinnerSet<Color>,
    weak: bool,
) -> Result<bool> {
    let local_colors = neighbor_colors(graph, node, coloring)?;
    if local_colors.is_empty() {
        return Ok(false);
    }
    let local = winners(local_colors)?;
    if !weak && (global.is_tie() || local.is_tie()) {
        return Ok(false);
    }
    Ok(*global != local)
}

/// Checks whether `node` is under majority illusion.
///
/// In strict mode (`weak == false`) a tie either globally or locally rules
/// the illusion out; in weak mode only the winner sets are compared.
pub fn check_majority(graph: &Graph, node: NodeId, coloring: &Coloring, weak: bool) -> Result<bool> {
    coloring.validate_for(graph)?;
    let global = global_winners(coloring)?;
    majority_at(graph, node, coloring, &global, weak)
}

/// Strict classification of a node, keeping ties visible.
pub fn classify_majority(graph: &Graph, node: NodeId, coloring: &Coloring) -> Result<Verdict> {
    coloring.validate_for(graph)?;
    let global = global_winners(coloring)?;
    let local_colors = neighbor_colors(graph, node, coloring)?;
    if local_colors.is_empty() {
        return Ok(Verdict::NoIllusion);
    }
    let local = winners(local_colors)?;
    if global.is_tie() || local.is_tie() {
        return Ok(Verdict::Tie);
    }
    Ok(if global != local {
        Verdict::Illusion
    } else {
        Verdict::NoIllusion
    })
}

/// Evaluates every node and votes over the node verdicts.
pub fn majority_illusion_over_graph(
    graph: &Graph,
    coloring: &Coloring,
    weak: bool,
) -> Result<MajorityReport> {
    if graph.num_nodes() == 0 {
        return Err(IllusionError::invalid_input("graph has no nodes"));
    }
    coloring.validate_for(graph)?;
    let global = global_winners(coloring)?;

    let node_verdicts = graph
        .nodes()
        .map(|node| majority_at(graph, node, coloring, &global, weak).map(|ill| (node, ill)))
        .collect::<Result<Vec<_>>>()?;
    let illusion_count = node_verdicts.iter().filter(|&&(_, ill)| ill).count();

    let vote = winners(node_verdicts.iter().map(|&(_, ill)| ill))?;
    let verdict = match vote.single() {
        Some(true) => Verdict::Illusion,
        Some(false) => Verdict::NoIllusion,
        None => Verdict::Tie,
    };

    log::debug!(
        "Majority illusion ({} mode): {}/{} nodes, verdict {:?}",
        if weak { "weak" } else { "strict" },
        illusion_count,
        node_verdicts.len(),
        verdict
    );

    Ok(MajorityReport {
        node_verdicts,
        illusion_count,
        verdict,
    })
}

/// Majority-majority illusion: most nodes are under majority illusion.
pub fn check_majority_majority_illusion(
    graph: &Graph,
    coloring: &Coloring,
    weak: bool,
) -> Result<bool> {
    Ok(majority_illusion_over_graph(graph, coloring, weak)?.has_illusion())
}
