//! DIMACS graph file format parser.
//!
//! Loads externally generated graphs for the evaluator to inspect.
//!
//! ## Format Specification
//! - Lines starting with 'c' are comments (ignored)
//! - `p edge N M` declares an undirected graph, `p arc N M` a directed one
//! - `e U V` (or `a U V`) declares an edge; vertices are 1-indexed and kept as node ids
//!
//! ## Example
//! ```text
//! c majority-weak-majority illusion digraph
//! p arc 4 8
//! a 1 2
//! a 1 3
//! a 2 3
//! ```

use crate::{Graph, GraphKind, IllusionError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

fn parse_error(message: impl Into<String>) -> IllusionError {
    IllusionError::invalid_input(message.into())
}

/// Parses a DIMACS file into a [`Graph`].
///
/// Self-loops are skipped and repeated edges are ignored, so random generators
/// that emit multigraphs can be loaded directly.
pub fn parse_dimacs_file<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)?;
    log::debug!("Loading DIMACS graph from {}", path_ref.display());
    parse_dimacs_reader(BufReader::new(file))
}

/// Parses DIMACS text held in memory.
pub fn parse_dimacs_str(content: &str) -> Result<Graph> {
    parse_dimacs_reader(content.as_bytes())
}

fn parse_dimacs_reader<R: Read>(reader: R) -> Result<Graph> {
    let reader = BufReader::new(reader);
    let mut graph: Option<Graph> = None;
    let mut num_vertices = 0u32;
    let mut num_edges_declared = 0usize;
    let mut self_loops = 0usize;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "p" => {
                if parts.len() < 4 {
                    return Err(parse_error(format!(
                        "Invalid problem line format at line {}: expected 'p edge N M', got '{}'",
                        line_num + 1,
                        line
                    )));
                }
                if graph.is_some() {
                    return Err(parse_error(format!(
                        "Duplicate problem line at line {}",
                        line_num + 1
                    )));
                }
                let kind = match parts[1] {
                    "edge" | "col" => GraphKind::Undirected,
                    "arc" => GraphKind::Directed,
                    other => {
                        return Err(parse_error(format!(
                            "Unsupported problem type '{}' at line {}: expected 'edge' or 'arc'",
                            other,
                            line_num + 1
                        )))
                    }
                };
                num_vertices = parts[2].parse().map_err(|_| {
                    parse_error(format!(
                        "Invalid vertex count '{}' at line {}",
                        parts[2],
                        line_num + 1
                    ))
                })?;
                num_edges_declared = parts[3].parse().map_err(|_| {
                    parse_error(format!(
                        "Invalid edge count '{}' at line {}",
                        parts[3],
                        line_num + 1
                    ))
                })?;
                graph = Some(Graph::with_nodes(kind, 1..=num_vertices));
            }
            "e" | "a" => {
                let graph = graph.as_mut().ok_or_else(|| {
                    parse_error(format!(
                        "Edge at line {} appears before problem line",
                        line_num + 1
                    ))
                })?;
                if parts.len() < 3 {
                    return Err(parse_error(format!(
                        "Invalid edge line format at line {}: expected 'e U V', got '{}'",
                        line_num + 1,
                        line
                    )));
                }
                let u = parse_vertex(parts[1], num_vertices, line_num)?;
                let v = parse_vertex(parts[2], num_vertices, line_num)?;
                if u == v {
                    self_loops += 1;
                    continue;
                }
                graph.add_edge(u, v)?;
            }
            other => {
                return Err(parse_error(format!(
                    "Unknown line type '{}' at line {}",
                    other,
                    line_num + 1
                )));
            }
        }
    }

    let graph = graph.ok_or_else(|| parse_error("Missing problem line 'p edge N M'"))?;
    if graph.num_edges() != num_edges_declared {
        log::debug!(
            "DIMACS edge count mismatch: declared {}, loaded {} ({} self-loops skipped)",
            num_edges_declared,
            graph.num_edges(),
            self_loops
        );
    }
    Ok(graph)
}

fn parse_vertex(token: &str, num_vertices: u32, line_num: usize) -> Result<u32> {
    let vertex: u32 = token.parse().map_err(|_| {
        parse_error(format!(
            "Invalid vertex ID '{}' at line {}",
            token,
            line_num + 1
        ))
    })?;
    if vertex == 0 || vertex > num_vertices {
        return Err(parse_error(format!(
            "Vertex {} out of range [1, {}] at line {}",
            vertex,
            num_vertices,
            line_num + 1
        )));
    }
    Ok(vertex)
}

/// Renders a graph in DIMACS format.
///
/// Node ids are written as-is, so the graph should use ids `1..=N`.
pub fn to_dimacs_string(graph: &Graph) -> String {
    let (problem, edge) = match graph.kind {
        GraphKind::Undirected => ("edge", 'e'),
        GraphKind::Directed => ("arc", 'a'),
    };
    let mut out = format!("p {} {} {}\n", problem, graph.num_nodes(), graph.num_edges());
    for (u, v) in graph.edges() {
        out.push_str(&format!("{} {} {}\n", edge, u, v));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_dimacs(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_directed_example() {
        let content = "\
c majority-weak-majority illusion
p arc 4 8
a 1 2
a 1 3
a 2 3
a 2 1
a 2 4
a 3 4
a 3 2
a 4 2
";
        let file = create_temp_dimacs(content);
        let graph = parse_dimacs_file(file.path()).unwrap();

        assert_eq!(graph.kind, GraphKind::Directed);
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_edges(), 8);
        assert_eq!(graph.neighbors(2).collect::<Vec<_>>(), vec![1, 3, 4]);
    }

    #[test]
    fn test_parse_self_loop_and_duplicate_ignored() {
        let graph = parse_dimacs_str("p edge 3 4\ne 1 2\ne 1 1\ne 2 1\ne 2 3\n").unwrap();
        assert_eq!(graph.kind, GraphKind::Undirected);
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_parse_error_no_problem_line() {
        match parse_dimacs_str("e 1 2\n") {
            Err(IllusionError::InvalidInput(message)) => {
                assert!(message.contains("before problem line"), "got: {}", message);
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_vertex_out_of_range() {
        match parse_dimacs_str("p edge 3 1\ne 1 5\n") {
            Err(IllusionError::InvalidInput(message)) => assert!(message.contains("out of range")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(parse_dimacs_str("p edge 3 1\ne 0 1\n").is_err());
        assert!(parse_dimacs_str("p edge 3 1\ne 1 abc\n").is_err());
        assert!(parse_dimacs_str("p edge 3\n").is_err());
        assert!(parse_dimacs_str("p tree 3 1\n").is_err());
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = parse_dimacs_file("/nonexistent/path/to/file.col");
        assert!(matches!(result, Err(IllusionError::IoError(_))));
    }

    #[test]
    fn test_writer_output_parses_back() {
        let graph = Graph::from_edges(GraphKind::Undirected, 1..=3, &[(1, 2), (2, 3)]).unwrap();
        let text = to_dimacs_string(&graph);
        assert!(text.starts_with("p edge 3 2\n"));
        assert_eq!(parse_dimacs_str(&text).unwrap(), graph);
    }
}
