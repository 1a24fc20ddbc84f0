//! Exhaustive coloring enumeration and cancellable search.
//!
//! The enumeration order matches a nested loop over nodes in ascending order
//! where the first node is the outermost (most significant) digit.

use illusion_core::{Color, Coloring, Graph, IllusionError, NodeId, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// All `palette.len() ^ n` colorings of a graph's nodes.
#[derive(Debug, Clone)]
pub struct ColoringEnumerator {
    nodes: Vec<NodeId>,
    palette: Vec<Color>,
    total: u64,
    next: u64,
}

impl ColoringEnumerator {
    pub fn new(graph: &Graph, palette: &[Color]) -> Result<Self> {
        if palette.is_empty() {
            return Err(IllusionError::invalid_input("palette is empty"));
        }
        let nodes: Vec<NodeId> = graph.nodes().collect();
        let exponent = u32::try_from(nodes.len())
            .map_err(|_| IllusionError::invalid_input("too many nodes to enumerate"))?;
        let total = (palette.len() as u64).checked_pow(exponent).ok_or_else(|| {
            IllusionError::invalid_input(format!(
                "{}^{} colorings overflow the enumeration range",
                palette.len(),
                nodes.len()
            ))
        })?;
        Ok(Self {
            nodes,
            palette: palette.to_vec(),
            total,
            next: 0,
        })
    }

    /// Number of colorings.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Decodes the coloring at position `index` of the enumeration.
    pub fn coloring_at(&self, mut index: u64) -> Coloring {
        let base = self.palette.len() as u64;
        let mut colors = vec![self.palette[0]; self.nodes.len()];
        for slot in colors.iter_mut().rev() {
            *slot = self.palette[(index % base) as usize];
            index /= base;
        }
        self.nodes.iter().copied().zip(colors).collect()
    }
}

impl Iterator for ColoringEnumerator {
    type Item = Coloring;

    fn next(&mut self) -> Option<Coloring> {
        if self.next >= self.total {
            return None;
        }
        let coloring = self.coloring_at(self.next);
        self.next += 1;
        Some(coloring)
    }
}

/// How a coloring search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The lowest-index coloring satisfying the predicate
    Found { index: u64, coloring: Coloring },
    /// No coloring satisfied the predicate
    Exhausted { examined: u64 },
    /// The cancel flag was raised before a match was found
    Cancelled { examined: u64 },
}

impl SearchOutcome {
    pub fn coloring(&self) -> Option<&Coloring> {
        match self {
            SearchOutcome::Found { coloring, .. } => Some(coloring),
            _ => None,
        }
    }
}

/// Searches all colorings for one satisfying `predicate`.
///
/// Colorings are tested in parallel; the match with the lowest enumeration
/// index wins, so results are reproducible. Raising `cancel` stops the search
/// early, and the first predicate error aborts it.
pub fn search_colorings<F>(
    graph: &Graph,
    palette: &[Color],
    cancel: &AtomicBool,
    predicate: F,
) -> Result<SearchOutcome>
where
    F: Fn(&Coloring) -> Result<bool> + Sync,
{
    let enumerator = ColoringEnumerator::new(graph, palette)?;
    let examined = AtomicU64::new(0);
    let failure: Mutex<Option<IllusionError>> = Mutex::new(None);
    let aborted = AtomicBool::new(false);

    let hit = (0..enumerator.total()).into_par_iter().find_map_first(|index| {
        if cancel.load(Ordering::Relaxed) || aborted.load(Ordering::Relaxed) {
            return None;
        }
        examined.fetch_add(1, Ordering::Relaxed);
        let coloring = enumerator.coloring_at(index);
        match predicate(&coloring) {
            Ok(true) => Some((index, coloring)),
            Ok(false) => None,
            Err(err) => {
                aborted.store(true, Ordering::Relaxed);
                if let Ok(mut slot) = failure.lock() {
                    slot.get_or_insert(err);
                }
                None
            }
        }
    });

    if let Some(err) = failure.into_inner().ok().flatten() {
        return Err(err);
    }
    let examined = examined.into_inner();
    Ok(match hit {
        Some((index, coloring)) => {
            log::info!(
                "Coloring #{} of {} satisfies the search predicate",
                index,
                enumerator.total()
            );
            SearchOutcome::Found { index, coloring }
        }
        None if cancel.load(Ordering::Relaxed) => {
            log::warn!("Coloring search cancelled after {} colorings", examined);
            SearchOutcome::Cancelled { examined }
        }
        None => SearchOutcome::Exhausted { examined },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::majority::check_majority_majority_illusion;
    use illusion_core::GraphKind;

    const B: Color = Color::BLUE;
    const R: Color = Color::RED;

    #[test]
    fn test_enumeration_order() {
        let graph = Graph::with_nodes(GraphKind::Directed, 1..=2);
        let all: Vec<Vec<Color>> = ColoringEnumerator::new(&graph, &[B, R])
            .unwrap()
            .map(|c| c.colors())
            .collect();
        assert_eq!(all, vec![vec![B, B], vec![B, R], vec![R, B], vec![R, R]]);
    }

    #[test]
    fn test_enumeration_size_guards() {
        let graph = Graph::with_nodes(GraphKind::Directed, 0..3);
        assert_eq!(
            ColoringEnumerator::new(&graph, &Color::palette(4))
                .unwrap()
                .total(),
            64
        );
        assert!(ColoringEnumerator::new(&graph, &[]).is_err());

        let big = Graph::with_nodes(GraphKind::Directed, 0..70);
        assert!(ColoringEnumerator::new(&big, &[B, R]).is_err());
    }

    #[test]
    fn test_finds_lowest_index_match() {
        let graph = Graph::with_nodes(GraphKind::Directed, 0..4);
        let cancel = AtomicBool::new(false);
        let outcome = search_colorings(&graph, &[B, R], &cancel, |c| {
            Ok(c.class(R).len() == 2)
        })
        .unwrap();
        // B B R R is the first coloring with two reds.
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                index: 3,
                coloring: Coloring::from_sequence(0..4, &[B, B, R, R]).unwrap(),
            }
        );
    }

    #[test]
    fn test_cancelled_search() {
        let graph = Graph::with_nodes(GraphKind::Directed, 0..4);
        let cancel = AtomicBool::new(true);
        let outcome = search_colorings(&graph, &[B, R], &cancel, |_| Ok(true)).unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled { examined: 0 });
    }

    #[test]
    fn test_directed_triangle_never_has_majority_majority_illusion() {
        let graph =
            Graph::from_edges(GraphKind::Directed, 0..3, &[(0, 1), (1, 2), (2, 0)]).unwrap();
        let cancel = AtomicBool::new(false);
        let outcome = search_colorings(&graph, &[B, R], &cancel, |c| {
            check_majority_majority_illusion(&graph, c, false)
        })
        .unwrap();
        assert_eq!(outcome, SearchOutcome::Exhausted { examined: 8 });
    }

    #[test]
    fn test_predicate_error_propagates() {
        let graph = Graph::with_nodes(GraphKind::Directed, 0..2);
        let cancel = AtomicBool::new(false);
        let result = search_colorings(&graph, &[B, R], &cancel, |_| {
            Err(IllusionError::invalid_input("boom"))
        });
        assert!(matches!(result, Err(IllusionError::InvalidInput(_))));
    }
}
