//! Illusion CLI entry point.
//!
//! Builds k-regular majority-illusion graphs, evaluates colored graphs, and
//! searches random digraphs for colorings with (or without) illusions.

mod config;
mod generator;

use anyhow::{Context, Result};
use clap::Parser;
use config::{IllusionConfig, SearchTarget};
use illusion_core::dimacs::{parse_dimacs_file, to_dimacs_string};
use illusion_core::{Color, Coloring, Graph, GraphStats, IllusionError, NodeId};
use illusion_eval::{
    check_majority_majority_illusion, check_plurality, check_quota, classify_majority,
    majority_illusion_over_graph, plurality_illusion_over_graph, quota_illusion_over_graph,
    search_colorings, update_until_stable, DynamicsOutcome, IllusionPair, KFractionIllusion,
    MajorityReport, SearchOutcome, Verdict,
};
use illusion_synth::{synthesize, SynthesisReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "illusion")]
#[command(version = VERSION)]
#[command(about = "Majority illusion: synthesis, evaluation and search on colored graphs", long_about = None)]
struct Args {
    /// Execution mode: synth (default), evaluate, search, dynamics
    ///
    /// - synth: build a k-regular graph with majority-majority illusion
    /// - evaluate: check every illusion criterion on a DIMACS graph
    /// - search: random digraphs until a coloring hits the target
    /// - dynamics: synthesize, then apply the plurality update rule
    #[arg(long, default_value = "synth")]
    mode: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of nodes (synth, dynamics, search)
    #[arg(short = 'n', long)]
    nodes: Option<usize>,

    /// Degree of the synthesized graph
    #[arg(short = 'k', long)]
    degree: Option<usize>,

    /// Input graph in DIMACS format (evaluate)
    #[arg(short, long)]
    input: Option<String>,

    /// Comma-separated node colors in ascending node order (evaluate)
    ///
    /// Example: --colors blue,red,blue,blue
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    /// Search target: majority, no-majority, plurality, quota
    #[arg(long)]
    target: Option<String>,

    /// RNG seed for generated graphs
    #[arg(long)]
    seed: Option<u64>,

    /// Random graphs to try before giving up
    #[arg(long)]
    max_graphs: Option<usize>,

    /// Weak tie handling for majority checks
    #[arg(long)]
    weak: bool,

    /// Write results here instead of stdout (`.col` writes DIMACS in synth mode)
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("illusion {} - mode {}", VERSION, args.mode);

    let config = load_config(&args)?;

    let result = match args.mode.as_str() {
        "synth" => run_synth_mode(&args, &config),
        "evaluate" => run_evaluate_mode(&args, &config),
        "search" => run_search_mode(&config),
        "dynamics" => run_dynamics_mode(&args, &config),
        unknown => anyhow::bail!(
            "Unknown mode: {}. Valid modes: synth, evaluate, search, dynamics",
            unknown
        ),
    };

    if let Err(e) = &result {
        if let Some(illusion_err) = e.downcast_ref::<IllusionError>() {
            log::error!("{}", illusion_err.user_message());
        }
    }
    result
}

/// Reads the config file (if any) and applies command-line overrides.
fn load_config(args: &Args) -> Result<IllusionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            IllusionConfig::from_file(path)?
        }
        None => IllusionConfig::default(),
    };

    if let Some(n) = args.nodes {
        config.synthesis.num_nodes = n;
        config.search.num_nodes = n;
    }
    if let Some(k) = args.degree {
        config.synthesis.degree = k;
    }
    if let Some(target) = &args.target {
        config.search.target = target.parse()?;
    }
    if let Some(seed) = args.seed {
        config.search.seed = seed;
    }
    if let Some(max_graphs) = args.max_graphs {
        config.search.max_graphs = max_graphs;
    }
    if args.weak {
        config.search.weak = true;
    }

    config
        .validate_for_mode(&args.mode)
        .context("Invalid configuration")?;
    Ok(config)
}

fn emit<T: Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            log::info!("Results written to {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ============================================================================
// Synth
// ============================================================================

#[derive(Serialize)]
struct SynthOutput {
    stats: GraphStats,
    edges: Vec<(NodeId, NodeId)>,
    coloring: Coloring,
    report: SynthesisReport,
    majority: MajorityReport,
}

fn run_synth_mode(args: &Args, config: &IllusionConfig) -> Result<()> {
    let (n, k) = (config.synthesis.num_nodes, config.synthesis.degree);
    let synthesis = synthesize(n, k)?;
    let majority = majority_illusion_over_graph(&synthesis.graph, &synthesis.coloring, false)?;

    log::info!(
        "{}-regular graph on {} nodes: {}/{} nodes under majority illusion, verdict {:?}",
        k,
        n,
        majority.illusion_count,
        n,
        majority.verdict
    );

    if let Some(path) = args.output.as_deref().filter(|p| p.ends_with(".col")) {
        std::fs::write(path, to_dimacs_string(&synthesis.graph))
            .with_context(|| format!("Failed to write {}", path))?;
        log::info!("DIMACS graph written to {}", path);
        return Ok(());
    }

    let output = SynthOutput {
        stats: synthesis.graph.stats(),
        edges: synthesis.graph.edges(),
        coloring: synthesis.coloring,
        report: synthesis.report,
        majority,
    };
    emit(&output, args.output.as_deref())
}

// ============================================================================
// Evaluate
// ============================================================================

#[derive(Serialize)]
struct NodeEvaluation {
    node: NodeId,
    majority: Verdict,
    plurality: IllusionPair,
    quota: IllusionPair,
}

#[derive(Serialize)]
struct EvaluationOutput {
    stats: GraphStats,
    majority_strict: MajorityReport,
    majority_weak: MajorityReport,
    plurality: KFractionIllusion,
    quota: KFractionIllusion,
    nodes: Vec<NodeEvaluation>,
}

fn parse_coloring(graph: &Graph, names: &[String]) -> Result<Coloring> {
    let colors = names
        .iter()
        .map(|name| name.parse::<Color>())
        .collect::<illusion_core::Result<Vec<_>>>()?;
    Ok(Coloring::from_sequence(graph.nodes(), &colors)?)
}

fn run_evaluate_mode(args: &Args, config: &IllusionConfig) -> Result<()> {
    let input = args
        .input
        .as_deref()
        .context("evaluate mode requires --input <graph.col>")?;
    let graph = parse_dimacs_file(input)?;
    let coloring = parse_coloring(&graph, &args.colors)?;

    let eval = &config.evaluation;
    let nodes = graph
        .nodes()
        .map(|node| {
            Ok(NodeEvaluation {
                node,
                majority: classify_majority(&graph, node, &coloring)?,
                plurality: check_plurality(&graph, node, &coloring)?,
                quota: check_quota(&graph, node, &coloring, eval.quota)?,
            })
        })
        .collect::<illusion_core::Result<Vec<_>>>()?;

    let output = EvaluationOutput {
        stats: graph.stats(),
        majority_strict: majority_illusion_over_graph(&graph, &coloring, false)?,
        majority_weak: majority_illusion_over_graph(&graph, &coloring, true)?,
        plurality: plurality_illusion_over_graph(&graph, &coloring, eval.k_fraction)?,
        quota: quota_illusion_over_graph(&graph, &coloring, eval.quota, eval.k_fraction)?,
        nodes,
    };
    log::info!(
        "{}: strict majority verdict {:?}, weak {:?}",
        Path::new(input).display(),
        output.majority_strict.verdict,
        output.majority_weak.verdict
    );
    emit(&output, args.output.as_deref())
}

// ============================================================================
// Search
// ============================================================================

#[derive(Serialize)]
struct SearchResult {
    target: SearchTarget,
    attempt: usize,
    edges: Vec<(NodeId, NodeId)>,
    /// Matching coloring; absent for `no-majority`, where no coloring matched
    coloring: Option<Coloring>,
    coloring_index: Option<u64>,
}

fn search_graph(graph: &Graph, config: &IllusionConfig, cancel: &AtomicBool) -> Result<SearchOutcome> {
    let search = &config.search;
    let eval = &config.evaluation;
    let outcome = match search.target {
        SearchTarget::Majority | SearchTarget::NoMajority => {
            search_colorings(graph, &Color::palette(2), cancel, |coloring| {
                check_majority_majority_illusion(graph, coloring, search.weak)
            })?
        }
        SearchTarget::Plurality => {
            search_colorings(graph, &Color::palette(search.palette_size), cancel, |coloring| {
                Ok(plurality_illusion_over_graph(graph, coloring, eval.k_fraction)?.strict_over)
            })?
        }
        SearchTarget::Quota => {
            search_colorings(graph, &Color::palette(search.palette_size), cancel, |coloring| {
                Ok(quota_illusion_over_graph(graph, coloring, eval.quota, eval.k_fraction)?.strict_over)
            })?
        }
    };
    Ok(outcome)
}

fn run_search_mode(config: &IllusionConfig) -> Result<()> {
    let search = &config.search;
    let mut rng = StdRng::seed_from_u64(search.seed);
    let cancel = Arc::new(AtomicBool::new(false));

    if let Some(secs) = search.time_limit_secs {
        let flag = Arc::clone(&cancel);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            flag.store(true, Ordering::Relaxed);
        });
    }

    log::info!(
        "Searching up to {} random {}-out digraphs on {} nodes for {:?}",
        search.max_graphs,
        search.out_degree,
        search.num_nodes,
        search.target
    );

    for attempt in 1..=search.max_graphs {
        let graph = generator::random_k_out_digraph(&mut rng, search.num_nodes, search.out_degree)?;
        let outcome = search_graph(&graph, config, &cancel)?;

        let (coloring_index, coloring) = match (search.target, outcome) {
            (_, SearchOutcome::Cancelled { examined }) => {
                log::warn!(
                    "Time limit reached on graph {} after {} colorings",
                    attempt,
                    examined
                );
                return Ok(());
            }
            (SearchTarget::NoMajority, SearchOutcome::Exhausted { examined }) => {
                log::info!(
                    "Graph {}: none of {} colorings has majority-majority illusion",
                    attempt,
                    examined
                );
                (None, None)
            }
            (SearchTarget::NoMajority, SearchOutcome::Found { .. })
            | (_, SearchOutcome::Exhausted { .. }) => {
                log::debug!("Graph {} rejected", attempt);
                continue;
            }
            (_, SearchOutcome::Found { index, coloring }) => (Some(index), Some(coloring)),
        };

        return emit(
            &SearchResult {
                target: search.target,
                attempt,
                edges: graph.edges(),
                coloring,
                coloring_index,
            },
            None,
        );
    }

    log::warn!(
        "No graph matched {:?} within {} attempts",
        search.target,
        search.max_graphs
    );
    Ok(())
}

// ============================================================================
// Dynamics
// ============================================================================

#[derive(Serialize)]
struct DynamicsOutput {
    illusion_before: bool,
    illusion_after: bool,
    before: MajorityReport,
    after: MajorityReport,
    outcome: DynamicsOutcome,
}

fn run_dynamics_mode(args: &Args, config: &IllusionConfig) -> Result<()> {
    let synth = &config.synthesis;
    let synthesis = synthesize(synth.num_nodes, synth.degree)?;
    let graph = &synthesis.graph;

    let before = majority_illusion_over_graph(graph, &synthesis.coloring, config.search.weak)?;
    let outcome = update_until_stable(graph, &synthesis.coloring, synth.max_steps)?;
    let after = majority_illusion_over_graph(graph, &outcome.coloring, config.search.weak)?;

    log::info!(
        "Dynamics: {} steps (stable: {}), illusion {} -> {}",
        outcome.steps,
        outcome.stable,
        before.has_illusion(),
        after.has_illusion()
    );

    emit(
        &DynamicsOutput {
            illusion_before: before.has_illusion(),
            illusion_after: after.has_illusion(),
            before,
            after,
            outcome,
        },
        args.output.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use illusion_core::GraphKind;

    #[test]
    fn test_parse_coloring_by_name() {
        let graph = Graph::with_nodes(GraphKind::Directed, 1..=3);
        let names: Vec<String> = ["blue", "RED", "c3"].iter().map(|s| s.to_string()).collect();
        let coloring = parse_coloring(&graph, &names).unwrap();
        assert_eq!(coloring.colors(), vec![Color::BLUE, Color::RED, Color::GREEN]);

        assert!(parse_coloring(&graph, &names[..2]).is_err());
        let bad = vec!["blue".to_string(), "mauve".to_string(), "red".to_string()];
        assert!(parse_coloring(&graph, &bad).is_err());
    }

    #[test]
    fn test_node_override_is_checked_per_mode() {
        let args = Args::parse_from(["illusion", "--mode", "search", "-n", "4", "--target", "no-majority"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.search.num_nodes, 4);
        assert_eq!(config.search.target, SearchTarget::NoMajority);

        let args = Args::parse_from(["illusion", "--mode", "synth", "-n", "4"]);
        assert!(load_config(&args).is_err());

        let args = Args::parse_from(["illusion", "--mode", "synth", "-n", "18", "-k", "7"]);
        let config = load_config(&args).unwrap();
        assert_eq!((config.synthesis.num_nodes, config.synthesis.degree), (18, 7));
    }

    #[test]
    fn test_search_graph_targets() {
        // 0 <-> 1 with 2 and 3 pointing at 1: colour 1 red, everything else blue.
        let graph = Graph::from_edges(
            GraphKind::Directed,
            0..4,
            &[(0, 1), (1, 0), (2, 1), (3, 1)],
        )
        .unwrap();
        let cancel = AtomicBool::new(false);
        let mut config = IllusionConfig::default();

        config.search.target = SearchTarget::Majority;
        let outcome = search_graph(&graph, &config, &cancel).unwrap();
        let coloring = outcome.coloring().unwrap();
        assert!(check_majority_majority_illusion(&graph, coloring, false).unwrap());

        let cancel = AtomicBool::new(true);
        config.search.target = SearchTarget::Plurality;
        let outcome = search_graph(&graph, &config, &cancel).unwrap();
        assert!(matches!(outcome, SearchOutcome::Cancelled { .. }));
    }
}
