//! Plurality and quota illusions on a k-ary palette.

use crate::winners::{determine_quota_winners, neighbor_colors, validate_quota, winners, WinnerSet};
use illusion_core::{Color, Coloring, Graph, NodeId, Result};
use serde::{Deserialize, Serialize};

/// Strict and weak illusion flags for one node.
///
/// Strict: the local and global winner sets share no color.
/// Weak: the two sets are not identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllusionPair {
    pub strict: bool,
    pub weak: bool,
}

pub(crate) fn plurality_at(
    graph: &Graph,
    node: NodeId,
    coloring: &Coloring,
    global: &WinnerSet<Color>,
) -> Result<IllusionPair> {
    let local_colors = neighbor_colors(graph, node, coloring)?;
    let local = if local_colors.is_empty() {
        WinnerSet::empty()
    } else {
        winners(local_colors)?
    };
    Ok(IllusionPair {
        strict: local.is_disjoint(global),
        weak: local != *global,
    })
}

pub(crate) fn quota_at(
    graph: &Graph,
    node: NodeId,
    coloring: &Coloring,
    global: &WinnerSet<Color>,
    quota: f64,
) -> Result<IllusionPair> {
    let local = determine_quota_winners(&neighbor_colors(graph, node, coloring)?, quota)?;
    Ok(IllusionPair {
        strict: !local.is_empty() && !global.is_empty() && local.is_disjoint(global),
        weak: local != *global,
    })
}

/// Checks plurality illusion at `node`.
///
/// A node without out-neighbours has an empty local winner set, which is
/// disjoint from (and different to) any global winner set.
pub fn check_plurality(graph: &Graph, node: NodeId, coloring: &Coloring) -> Result<IllusionPair> {
    coloring.validate_for(graph)?;
    let global = winners(coloring.colors())?;
    plurality_at(graph, node, coloring, &global)
}

/// Checks quota illusion at `node` for a quota fraction in (0, 1).
///
/// Strict quota illusion needs both winner sets non-empty, so a node without
/// out-neighbours is never strictly deceived.
pub fn check_quota(
    graph: &Graph,
    node: NodeId,
    coloring: &Coloring,
    quota: f64,
) -> Result<IllusionPair> {
    validate_quota(quota)?;
    coloring.validate_for(graph)?;
    let global = determine_quota_winners(&coloring.colors(), quota)?;
    quota_at(graph, node, coloring, &global, quota)
}
