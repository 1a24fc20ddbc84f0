//! Core data types for colored graphs.
//!
//! A [`Graph`] is a finite node set plus edges, either undirected (used by the
//! synthesizer) or directed (used by the evaluator, where neighbours are
//! out-neighbours). Colors live outside the graph in a [`Coloring`].

use crate::errors::{IllusionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Opaque node identifier, unique within a graph.
pub type NodeId = u32;

/// Edge semantics of a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    /// Edges are unordered pairs
    Undirected,
    /// Edges are ordered pairs; neighbours are out-neighbours
    Directed,
}

/// Graph with an ordered adjacency structure.
///
/// Invariants: no self-loops, at most one edge per ordered (directed) or
/// unordered (undirected) pair. Iteration is always in ascending node order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Edge semantics
    pub kind: GraphKind,

    /// Out-adjacency: node -> neighbours
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,

    /// Number of edges (unordered pairs for undirected graphs)
    num_edges: usize,
}

impl Graph {
    /// Creates a new graph without nodes.
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            adjacency: BTreeMap::new(),
            num_edges: 0,
        }
    }

    /// Creates an edgeless graph on the given nodes.
    pub fn with_nodes(kind: GraphKind, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut graph = Self::new(kind);
        for node in nodes {
            graph.add_node(node);
        }
        graph
    }

    /// Builds a graph from a node list and an edge list.
    pub fn from_edges(
        kind: GraphKind,
        nodes: impl IntoIterator<Item = NodeId>,
        edges: &[(NodeId, NodeId)],
    ) -> Result<Self> {
        let mut graph = Self::with_nodes(kind, nodes);
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Adds a node. Returns `false` if it was already present.
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, BTreeSet::new());
        true
    }

    /// Adds an edge between two existing nodes.
    ///
    /// Returns `Ok(false)` if the edge already exists. Self-loops and unknown
    /// endpoints are rejected.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<bool> {
        if u == v {
            return Err(IllusionError::invalid_input(format!(
                "self-loop on node {} is not allowed",
                u
            )));
        }
        if !self.contains_node(v) {
            return Err(IllusionError::invalid_input(format!(
                "edge ({}, {}) references unknown node {}",
                u, v, v
            )));
        }
        let inserted = match self.adjacency.get_mut(&u) {
            Some(neighbors) => neighbors.insert(v),
            None => {
                return Err(IllusionError::invalid_input(format!(
                    "edge ({}, {}) references unknown node {}",
                    u, v, u
                )))
            }
        };
        if !inserted {
            return Ok(false);
        }
        if self.kind == GraphKind::Undirected {
            if let Some(neighbors) = self.adjacency.get_mut(&v) {
                neighbors.insert(u);
            }
        }
        self.num_edges += 1;
        Ok(true)
    }

    /// Removes an edge. Returns `false` if it was not present.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self
            .adjacency
            .get_mut(&u)
            .map(|neighbors| neighbors.remove(&v))
            .unwrap_or(false);
        if !removed {
            return false;
        }
        if self.kind == GraphKind::Undirected {
            if let Some(neighbors) = self.adjacency.get_mut(&v) {
                neighbors.remove(&u);
            }
        }
        self.num_edges -= 1;
        true
    }

    /// Checks for the edge `u -> v` (or `{u, v}` when undirected).
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.adjacency
            .get(&u)
            .map(|neighbors| neighbors.contains(&v))
            .unwrap_or(false)
    }

    /// Checks whether the node belongs to the graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Out-neighbours of a node in ascending order (empty for unknown nodes).
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().copied())
    }

    /// Out-degree of a node (0 for unknown nodes).
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency
            .get(&node)
            .map(|neighbors| neighbors.len())
            .unwrap_or(0)
    }

    /// All nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Edge list; undirected edges are reported once as `(low, high)`.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::with_capacity(self.num_edges);
        for (&u, neighbors) in &self.adjacency {
            for &v in neighbors {
                if self.kind == GraphKind::Directed || u < v {
                    edges.push((u, v));
                }
            }
        }
        edges
    }

    /// Checks that every node has (out-)degree exactly `k`.
    pub fn is_regular(&self, k: usize) -> bool {
        self.adjacency.values().all(|neighbors| neighbors.len() == k)
    }

    /// Connected components, each sorted ascending, ordered by smallest member.
    ///
    /// Directed graphs are treated as undirected (weak components).
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut undirected: BTreeMap<NodeId, BTreeSet<NodeId>> = self.adjacency.clone();
        if self.kind == GraphKind::Directed {
            for (&u, neighbors) in &self.adjacency {
                for &v in neighbors {
                    undirected.entry(v).or_default().insert(u);
                }
            }
        }

        let mut seen = BTreeSet::new();
        let mut components = Vec::new();
        for &start in undirected.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                for &next in &undirected[&node] {
                    if seen.insert(next) {
                        component.push(next);
                        queue.push_back(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Summary statistics.
    pub fn stats(&self) -> GraphStats {
        let degrees = self.adjacency.values().map(|n| n.len());
        GraphStats {
            num_nodes: self.num_nodes(),
            num_edges: self.num_edges,
            min_degree: degrees.clone().min().unwrap_or(0),
            max_degree: degrees.max().unwrap_or(0),
            components: self.connected_components().len(),
        }
    }
}

/// Graph summary used in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub components: usize,
}

/// A color ("opinion") drawn from a finite palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Color(pub u8);

impl Color {
    pub const BLUE: Color = Color(0);
    pub const RED: Color = Color(1);
    pub const YELLOW: Color = Color(2);
    pub const GREEN: Color = Color(3);

    const NAMES: [&'static str; 4] = ["blue", "red", "yellow", "green"];

    /// The first `size` colors of the palette.
    pub fn palette(size: usize) -> Vec<Color> {
        (0..size.min(u8::MAX as usize + 1))
            .map(|c| Color(c as u8))
            .collect()
    }

    /// Human-readable name for the four named colors.
    pub fn name(self) -> Option<&'static str> {
        Self::NAMES.get(self.0 as usize).copied()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "c{}", self.0),
        }
    }
}

impl FromStr for Color {
    type Err = IllusionError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(index) = Self::NAMES.iter().position(|name| *name == s) {
            return Ok(Color(index as u8));
        }
        let digits = s.strip_prefix('c').unwrap_or(&s);
        digits
            .parse::<u8>()
            .map(Color)
            .map_err(|_| IllusionError::invalid_input(format!("unknown color '{}'", s)))
    }
}

/// Total mapping from nodes to colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    colors: BTreeMap<NodeId, Color>,
}

impl Coloring {
    /// Creates an empty coloring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips a node sequence with a color sequence of the same length.
    pub fn from_sequence(
        nodes: impl IntoIterator<Item = NodeId>,
        colors: &[Color],
    ) -> Result<Self> {
        let nodes: Vec<NodeId> = nodes.into_iter().collect();
        if nodes.len() != colors.len() {
            return Err(IllusionError::invalid_input(format!(
                "{} nodes but {} colors",
                nodes.len(),
                colors.len()
            )));
        }
        Ok(nodes.into_iter().zip(colors.iter().copied()).collect())
    }

    /// Assigns a color, returning the previous one.
    pub fn insert(&mut self, node: NodeId, color: Color) -> Option<Color> {
        self.colors.insert(node, color)
    }

    /// Color of a node, if assigned.
    pub fn get(&self, node: NodeId) -> Option<Color> {
        self.colors.get(&node).copied()
    }

    /// Color of a node, or `InvalidInput` if the node is not colored.
    pub fn color_of(&self, node: NodeId) -> Result<Color> {
        self.get(node).ok_or_else(|| {
            IllusionError::invalid_input(format!("coloring has no color for node {}", node))
        })
    }

    /// Number of colored nodes.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Checks if no node is colored.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `(node, color)` pairs in ascending node order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Color)> + '_ {
        self.colors.iter().map(|(&node, &color)| (node, color))
    }

    /// All colors, in ascending node order.
    pub fn colors(&self) -> Vec<Color> {
        self.colors.values().copied().collect()
    }

    /// Nodes holding `color`, ascending.
    pub fn class(&self, color: Color) -> Vec<NodeId> {
        self.iter()
            .filter(|&(_, c)| c == color)
            .map(|(node, _)| node)
            .collect()
    }

    /// Checks that the coloring's domain equals the graph's node set.
    pub fn validate_for(&self, graph: &Graph) -> Result<()> {
        if let Some(missing) = graph.nodes().find(|node| !self.colors.contains_key(node)) {
            return Err(IllusionError::invalid_input(format!(
                "coloring has no color for node {}",
                missing
            )));
        }
        if let Some(extra) = self.colors.keys().find(|&&node| !graph.contains_node(node)) {
            return Err(IllusionError::invalid_input(format!(
                "coloring colors node {} which is not in the graph",
                extra
            )));
        }
        Ok(())
    }
}

impl FromIterator<(NodeId, Color)> for Coloring {
    fn from_iter<I: IntoIterator<Item = (NodeId, Color)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

/// Nodes sharing one color, with synthesis bookkeeping.
///
/// `target_degree` is the intra-class degree the synthesizer aims for and
/// `edge_counts` is a running degree counter; both are meaningless once the
/// graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorClass {
    pub color: Color,
    pub members: Vec<NodeId>,
    pub target_degree: usize,
    edge_counts: BTreeMap<NodeId, usize>,
}

impl ColorClass {
    /// Creates a class with zeroed counters.
    pub fn new(color: Color, members: Vec<NodeId>) -> Self {
        let edge_counts = members.iter().map(|&node| (node, 0)).collect();
        Self {
            color,
            members,
            target_degree: 0,
            edge_counts,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.edge_counts.contains_key(&node)
    }

    /// Refreshes every counter from the graph's current degrees.
    pub fn sync(&mut self, graph: &Graph) {
        for (&node, count) in self.edge_counts.iter_mut() {
            *count = graph.degree(node);
        }
    }

    /// Bumps the counter of a member after an edge was added to it.
    pub fn record_edge(&mut self, node: NodeId) {
        if let Some(count) = self.edge_counts.get_mut(&node) {
            *count += 1;
        }
    }

    /// Current counter of a member (0 for non-members).
    pub fn edge_count(&self, node: NodeId) -> usize {
        self.edge_counts.get(&node).copied().unwrap_or(0)
    }

    /// Checks whether a member's counter is still below `cap`.
    pub fn under(&self, node: NodeId, cap: usize) -> bool {
        self.edge_count(node) < cap
    }

    /// Members sorted ascending by counter, ties by node id.
    pub fn sorted_by_edge_count(&self) -> Vec<NodeId> {
        let mut members = self.members.clone();
        members.sort_by_key(|&node| (self.edge_count(node), node));
        members
    }

    /// Paints every member in `coloring`.
    pub fn paint(&self, coloring: &mut Coloring) {
        for &node in &self.members {
            coloring.insert(node, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undirected_edges_are_symmetric() {
        let mut graph = Graph::with_nodes(GraphKind::Undirected, 1..=3);
        assert!(graph.add_edge(1, 2).unwrap());
        assert!(!graph.add_edge(2, 1).unwrap());
        assert!(graph.has_edge(2, 1));
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.edges(), vec![(1, 2)]);

        assert!(graph.remove_edge(2, 1));
        assert!(!graph.has_edge(1, 2));
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn test_directed_edges_are_ordered() {
        let graph = Graph::from_edges(GraphKind::Directed, 0..3, &[(0, 1), (1, 0), (1, 2)])
            .unwrap();
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.degree(2), 0);
        assert!(!graph.has_edge(2, 1));
        assert_eq!(graph.connected_components(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_rejects_self_loop_and_unknown_node() {
        let mut graph = Graph::with_nodes(GraphKind::Undirected, 1..=2);
        assert!(matches!(
            graph.add_edge(1, 1),
            Err(IllusionError::InvalidInput(_))
        ));
        assert!(matches!(
            graph.add_edge(1, 9),
            Err(IllusionError::InvalidInput(_))
        ));
        assert!(matches!(
            graph.add_edge(9, 1),
            Err(IllusionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_components_and_stats() {
        let graph =
            Graph::from_edges(GraphKind::Undirected, 1..=5, &[(1, 2), (2, 3), (4, 5)]).unwrap();
        assert_eq!(graph.connected_components(), vec![vec![1, 2, 3], vec![4, 5]]);
        let stats = graph.stats();
        assert_eq!(stats.components, 2);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 2);
        assert!(!graph.is_regular(1));
    }

    #[test]
    fn test_color_names_round_trip() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::RED);
        assert_eq!("Blue".parse::<Color>().unwrap(), Color::BLUE);
        assert_eq!("7".parse::<Color>().unwrap(), Color(7));
        assert_eq!(Color(7).to_string(), "c7");
        assert_eq!(Color::GREEN.to_string(), "green");
        assert!("purple".parse::<Color>().is_err());
    }

    #[test]
    fn test_coloring_domain_validation() {
        let graph = Graph::with_nodes(GraphKind::Directed, 1..=3);
        let full = Coloring::from_sequence(1..=3, &[Color::RED, Color::BLUE, Color::RED]).unwrap();
        assert!(full.validate_for(&graph).is_ok());
        assert_eq!(full.class(Color::RED), vec![1, 3]);

        let partial = Coloring::from_sequence(1..=2, &[Color::RED, Color::BLUE]).unwrap();
        assert!(partial.validate_for(&graph).is_err());

        let mut extra = full.clone();
        extra.insert(4, Color::BLUE);
        assert!(extra.validate_for(&graph).is_err());

        assert!(Coloring::from_sequence(1..=3, &[Color::RED]).is_err());
    }

    #[test]
    fn test_color_class_counters() {
        let graph =
            Graph::from_edges(GraphKind::Undirected, 1..=4, &[(1, 2), (1, 3), (3, 4)]).unwrap();
        let mut class = ColorClass::new(Color::BLUE, vec![1, 3, 4]);
        class.sync(&graph);
        assert_eq!(class.edge_count(1), 2);
        assert_eq!(class.sorted_by_edge_count(), vec![4, 1, 3]);
        class.record_edge(4);
        assert!(!class.under(4, 2));
        assert!(!class.contains(2));
    }
}
