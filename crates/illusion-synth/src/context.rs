//! Construction state shared by the synthesis phases.

use illusion_core::{Color, ColorClass, Coloring, Graph, GraphKind, IllusionError, NodeId, Result};
use serde::{Deserialize, Serialize};

/// What one phase did to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: String,
    pub edges_added: usize,
    pub edges_removed: usize,
    /// Edge count after the phase
    pub edges_after: usize,
}

/// Serializable summary of a successful synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub num_nodes: usize,
    pub degree: usize,
    pub red_nodes: usize,
    pub blue_nodes: usize,
    /// Intra-class degree targeted for red nodes
    pub k_red: usize,
    /// Intra-class degree targeted for blue nodes
    pub k_blue: usize,
    /// Components merged by connectivity repair (1 when none were needed)
    pub components_repaired: usize,
    pub odd_correction: bool,
    pub phases: Vec<PhaseRecord>,
}

/// Single owner of the graph under construction.
///
/// Phases mutate the context in place; nothing else holds a reference to the
/// graph until synthesis finishes.
#[derive(Debug, Clone)]
pub struct SynthesisContext {
    /// Requested node count
    pub num_nodes: usize,

    /// Requested degree `k`
    pub degree: usize,

    /// Graph under construction (undirected, nodes `1..=n` once partitioned)
    pub graph: Graph,

    /// Majority class (`n/2 + 1` nodes)
    pub red: ColorClass,

    /// Minority class
    pub blue: ColorClass,

    /// An intra-class subgraph could not reach its target degree parity
    pub odd_deficit: bool,

    /// Component count seen by connectivity repair
    pub components_before_repair: usize,

    records: Vec<PhaseRecord>,
    added: usize,
    removed: usize,
}

impl SynthesisContext {
    /// Creates an empty context; the partition phase populates it.
    pub fn new(num_nodes: usize, degree: usize) -> Self {
        Self {
            num_nodes,
            degree,
            graph: Graph::new(GraphKind::Undirected),
            red: ColorClass::new(Color::RED, Vec::new()),
            blue: ColorClass::new(Color::BLUE, Vec::new()),
            odd_deficit: false,
            components_before_repair: 1,
            records: Vec::new(),
            added: 0,
            removed: 0,
        }
    }

    /// Adds an undirected edge and bumps both endpoint counters.
    ///
    /// Returns `Ok(false)` if the edge already existed.
    pub fn connect(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        if !self.graph.add_edge(u, v)? {
            return Ok(false);
        }
        for node in [u, v] {
            self.red.record_edge(node);
            self.blue.record_edge(node);
        }
        self.added += 1;
        Ok(true)
    }

    /// Removes an undirected edge. Class counters are resynced from the graph.
    pub fn disconnect(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self.graph.remove_edge(u, v);
        if removed {
            self.removed += 1;
            self.red.sync(&self.graph);
            self.blue.sync(&self.graph);
        }
        removed
    }

    pub fn degree_of(&self, node: NodeId) -> usize {
        self.graph.degree(node)
    }

    pub fn is_red(&self, node: NodeId) -> bool {
        self.red.contains(node)
    }

    /// Closes the bookkeeping for a finished phase.
    pub(crate) fn finish_phase(&mut self, phase: &str) {
        self.records.push(PhaseRecord {
            phase: phase.to_string(),
            edges_added: self.added,
            edges_removed: self.removed,
            edges_after: self.graph.num_edges(),
        });
        self.added = 0;
        self.removed = 0;
    }

    /// Red/blue coloring of every partitioned node.
    pub fn coloring(&self) -> Coloring {
        let mut coloring = Coloring::new();
        self.red.paint(&mut coloring);
        self.blue.paint(&mut coloring);
        coloring
    }

    /// Consumes the context into the finished graph, coloring and report.
    pub fn into_parts(self) -> Result<(Graph, Coloring, SynthesisReport)> {
        let coloring = self.coloring();
        coloring.validate_for(&self.graph).map_err(|e| {
            IllusionError::construction_failed("verification", e.to_string())
        })?;
        let report = SynthesisReport {
            num_nodes: self.num_nodes,
            degree: self.degree,
            red_nodes: self.red.len(),
            blue_nodes: self.blue.len(),
            k_red: self.red.target_degree,
            k_blue: self.blue.target_degree,
            components_repaired: self.components_before_repair,
            odd_correction: self.odd_deficit,
            phases: self.records,
        };
        Ok((self.graph, coloring, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SynthesisContext {
        let mut ctx = SynthesisContext::new(4, 3);
        ctx.graph = Graph::with_nodes(GraphKind::Undirected, 1..=4);
        ctx.red = ColorClass::new(Color::RED, vec![1, 2, 3]);
        ctx.blue = ColorClass::new(Color::BLUE, vec![4]);
        ctx
    }

    #[test]
    fn test_connect_tracks_counters() {
        let mut ctx = small();
        assert!(ctx.connect(1, 4).unwrap());
        assert!(!ctx.connect(4, 1).unwrap());
        assert!(ctx.connect(1, 2).unwrap());
        assert_eq!(ctx.red.edge_count(1), 2);
        assert_eq!(ctx.red.edge_count(2), 1);
        assert_eq!(ctx.blue.edge_count(4), 1);
        assert!(ctx.connect(1, 1).is_err());

        assert!(ctx.disconnect(1, 2));
        assert!(!ctx.disconnect(1, 2));
        assert_eq!(ctx.red.edge_count(1), 1);
    }

    #[test]
    fn test_phase_records() {
        let mut ctx = small();
        ctx.connect(1, 4).unwrap();
        ctx.connect(2, 4).unwrap();
        ctx.finish_phase("first");
        ctx.disconnect(2, 4);
        ctx.finish_phase("second");

        let (graph, coloring, report) = ctx.into_parts().unwrap();
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(coloring.class(Color::RED), vec![1, 2, 3]);
        assert_eq!(report.phases[0].edges_added, 2);
        assert_eq!(report.phases[1].edges_removed, 1);
        assert_eq!(report.phases[1].edges_after, 1);
    }
}
