//! # illusion-synth
//!
//! Deterministic construction of connected k-regular red/blue graphs in which
//! most nodes are under majority illusion.
//!
//! Seven phases run strictly in order on one [`SynthesisContext`]:
//!
//! 1. `partition`: nodes `1..=n`, red majority of `n/2 + 1`
//! 2. `degree-split`: intra-class degrees `k_red`, `k_blue`
//! 3. `bipartite-wiring`: round-robin red-blue edges
//! 4. `blue-fill`: blue-blue edges up to `k - k_blue`
//! 5. `intra-class`: circulant subgraphs per class, plus odd correction
//! 6. `connectivity-repair`: reroute one red-red edge per component
//! 7. `verification`: exactly k-regular and connected, or fail
//!
//! The first failing phase aborts the run with `ConstructionFailed`; there
//! are no retries and no partial results.

pub mod context;
pub mod phase1_partition;
pub mod phase2_degree_split;
pub mod phase3_bipartite;
pub mod phase4_blue_fill;
pub mod phase5_intra_class;
pub mod phase6_connectivity;
pub mod phase7_verify;

pub use context::{PhaseRecord, SynthesisContext, SynthesisReport};
pub use phase1_partition::Phase1Partition;
pub use phase2_degree_split::{intra_class_degrees, Phase2DegreeSplit};
pub use phase3_bipartite::Phase3BipartiteWiring;
pub use phase4_blue_fill::Phase4BlueFill;
pub use phase5_intra_class::Phase5IntraClass;
pub use phase6_connectivity::Phase6ConnectivityRepair;
pub use phase7_verify::Phase7Verification;

use illusion_core::{Coloring, Graph, IllusionError, Result};

/// One step of the construction.
pub trait SynthesisPhase {
    /// Phase name, reported in `ConstructionFailed` errors.
    fn name(&self) -> &'static str;

    /// Mutates the context. Later phases rely on what earlier ones built.
    fn execute(&mut self, ctx: &mut SynthesisContext) -> Result<()>;
}

/// A synthesized graph with its coloring and construction report.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub graph: Graph,
    pub coloring: Coloring,
    pub report: SynthesisReport,
}

/// Runs the construction phases in order.
pub struct RegularIllusionSynthesizer {
    phases: Vec<Box<dyn SynthesisPhase>>,
}

impl Default for RegularIllusionSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RegularIllusionSynthesizer {
    /// Synthesizer with the seven standard phases.
    pub fn new() -> Self {
        Self {
            phases: vec![
                Box::new(Phase1Partition),
                Box::new(Phase2DegreeSplit),
                Box::new(Phase3BipartiteWiring),
                Box::new(Phase4BlueFill),
                Box::new(Phase5IntraClass),
                Box::new(Phase6ConnectivityRepair),
                Box::new(Phase7Verification),
            ],
        }
    }

    /// Phase names in execution order.
    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|phase| phase.name()).collect()
    }

    /// Builds a connected `degree`-regular graph on `num_nodes` nodes.
    ///
    /// Requires `num_nodes >= 1` and `3 <= degree < num_nodes`; anything else
    /// is `InvalidInput`. Inputs outside the regime the construction covers
    /// fail with `ConstructionFailed` naming the phase that gave up.
    pub fn synthesize(&mut self, num_nodes: usize, degree: usize) -> Result<Synthesis> {
        validate_parameters(num_nodes, degree)?;
        log::info!(
            "Synthesizing {}-regular illusion graph on {} nodes",
            degree,
            num_nodes
        );

        let mut ctx = SynthesisContext::new(num_nodes, degree);
        for phase in self.phases.iter_mut() {
            let name = phase.name();
            if let Err(e) = phase.execute(&mut ctx) {
                log::warn!("Phase '{}' failed: {}", name, e);
                return Err(e);
            }
            ctx.finish_phase(name);
            log::debug!("Phase '{}' done, {} edges", name, ctx.graph.num_edges());
        }

        let (graph, coloring, report) = ctx.into_parts()?;
        log::info!(
            "Synthesized {} nodes / {} edges (k_red = {}, k_blue = {}, odd correction: {})",
            graph.num_nodes(),
            graph.num_edges(),
            report.k_red,
            report.k_blue,
            report.odd_correction
        );
        Ok(Synthesis {
            graph,
            coloring,
            report,
        })
    }
}

fn validate_parameters(num_nodes: usize, degree: usize) -> Result<()> {
    if num_nodes < 1 {
        return Err(IllusionError::invalid_input("graph needs at least one node"));
    }
    if degree < 3 {
        return Err(IllusionError::invalid_input(format!(
            "degree must be at least 3, got {}",
            degree
        )));
    }
    if degree >= num_nodes {
        return Err(IllusionError::invalid_input(format!(
            "degree {} must be below the node count {}",
            degree, num_nodes
        )));
    }
    Ok(())
}

/// Builds a connected k-regular graph and its red/blue coloring.
pub fn create_regular_illusion_graph(num_nodes: usize, degree: usize) -> Result<(Graph, Coloring)> {
    let synthesis = RegularIllusionSynthesizer::new().synthesize(num_nodes, degree)?;
    Ok((synthesis.graph, synthesis.coloring))
}

/// Like [`create_regular_illusion_graph`], keeping the construction report.
pub fn synthesize(num_nodes: usize, degree: usize) -> Result<Synthesis> {
    RegularIllusionSynthesizer::new().synthesize(num_nodes, degree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use illusion_core::Color;

    #[test]
    fn test_phase_order() {
        assert_eq!(
            RegularIllusionSynthesizer::new().phase_names(),
            vec![
                "partition",
                "degree-split",
                "bipartite-wiring",
                "blue-fill",
                "intra-class",
                "connectivity-repair",
                "verification",
            ]
        );
    }

    #[test]
    fn test_fourteen_nodes_degree_four() {
        let synthesis = synthesize(14, 4).unwrap();
        assert!(synthesis.graph.is_regular(4));
        assert_eq!(synthesis.graph.connected_components().len(), 1);
        assert_eq!(synthesis.coloring.class(Color::RED).len(), 8);
        assert_eq!(synthesis.report.components_repaired, 2);
        assert_eq!(synthesis.report.phases.len(), 7);
        assert_eq!(synthesis.report.phases[6].edges_after, 28);
    }

    #[test]
    fn test_parameter_bounds() {
        for (n, k) in [(0, 3), (10, 2), (5, 5), (5, 9)] {
            assert!(matches!(
                create_regular_illusion_graph(n, k),
                Err(IllusionError::InvalidInput(_))
            ));
        }
    }
}
