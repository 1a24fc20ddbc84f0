//! Opinion dynamics: nodes adopt the plurality color they observe.

use crate::winners::{neighbor_colors, winners};
use illusion_core::{Coloring, Graph, Result};
use serde::{Deserialize, Serialize};

/// One synchronous update step.
///
/// Every node adopts the unique plurality winner among its out-neighbours,
/// computed from the old coloring. Ties and nodes without neighbours keep
/// their current color.
pub fn update(graph: &Graph, coloring: &Coloring) -> Result<Coloring> {
    coloring.validate_for(graph)?;
    graph
        .nodes()
        .map(|node| {
            let current = coloring.color_of(node)?;
            let local = neighbor_colors(graph, node, coloring)?;
            if local.is_empty() {
                return Ok((node, current));
            }
            let next = winners(local)?.single().unwrap_or(current);
            Ok((node, next))
        })
        .collect()
}

/// Result of repeatedly applying [`update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicsOutcome {
    pub coloring: Coloring,
    /// Update steps that changed at least one color
    pub steps: usize,
    /// A fixed point was reached within the step budget
    pub stable: bool,
}

/// Applies [`update`] until nothing changes or `max_steps` steps have run.
pub fn update_until_stable(
    graph: &Graph,
    coloring: &Coloring,
    max_steps: usize,
) -> Result<DynamicsOutcome> {
    let mut current = coloring.clone();
    for step in 0..max_steps {
        let next = update(graph, &current)?;
        if next == current {
            return Ok(DynamicsOutcome {
                coloring: current,
                steps: step,
                stable: true,
            });
        }
        current = next;
    }
    let stable = update(graph, &current)? == current;
    if !stable {
        log::debug!("Dynamics did not settle within {} steps", max_steps);
    }
    Ok(DynamicsOutcome {
        coloring: current,
        steps: max_steps,
        stable,
    })
}
