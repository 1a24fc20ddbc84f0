//! Winner sets: the mode of a sequence with ties kept as first-class values.

use illusion_core::{Color, Coloring, Graph, IllusionError, NodeId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Every value attaining the maximum occurrence count.
///
/// A set with two or more members is a tie. An empty set only arises from
/// quota winners or from a node without neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSet<T: Ord = Color>(BTreeSet<T>);

impl<T: Ord + Copy> WinnerSet<T> {
    /// The set without winners.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Two or more values share the maximum count.
    pub fn is_tie(&self) -> bool {
        self.0.len() >= 2
    }

    /// The unique winner, if there is exactly one.
    pub fn single(&self) -> Option<T> {
        if self.0.len() == 1 {
            self.0.iter().next().copied()
        } else {
            None
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }
}

impl<T: Ord> FromIterator<T> for WinnerSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn occurrences<T: Ord + Copy>(items: impl IntoIterator<Item = T>) -> (BTreeMap<T, usize>, usize) {
    let mut counts = BTreeMap::new();
    let mut total = 0;
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
        total += 1;
    }
    (counts, total)
}

/// Returns every value whose count equals the maximum count.
///
/// Empty input is `InvalidInput`: callers must handle nodes without
/// neighbours before asking for a local winner.
pub fn winners<T: Ord + Copy>(items: impl IntoIterator<Item = T>) -> Result<WinnerSet<T>> {
    let (counts, _) = occurrences(items);
    let max = counts
        .values()
        .copied()
        .max()
        .ok_or_else(|| IllusionError::invalid_input("winners of an empty sequence"))?;
    Ok(counts
        .into_iter()
        .filter(|&(_, count)| count == max)
        .map(|(value, _)| value)
        .collect())
}

/// Colors whose share of `colors` strictly exceeds `quota`.
///
/// `quota` must lie in the open interval (0, 1). Empty input has no quota
/// winners.
pub fn determine_quota_winners(colors: &[Color], quota: f64) -> Result<WinnerSet<Color>> {
    validate_quota(quota)?;
    let (counts, total) = occurrences(colors.iter().copied());
    Ok(counts
        .into_iter()
        .filter(|&(_, count)| count as f64 / total as f64 > quota)
        .map(|(color, _)| color)
        .collect())
}

pub(crate) fn validate_quota(quota: f64) -> Result<()> {
    if quota.is_finite() && quota > 0.0 && quota < 1.0 {
        Ok(())
    } else {
        Err(IllusionError::invalid_input(format!(
            "quota must lie in (0, 1), got {}",
            quota
        )))
    }
}

/// Colors of a node's out-neighbours, in ascending neighbour order.
pub fn neighbor_colors(graph: &Graph, node: NodeId, coloring: &Coloring) -> Result<Vec<Color>> {
    if !graph.contains_node(node) {
        return Err(IllusionError::invalid_input(format!(
            "node {} is not in the graph",
            node
        )));
    }
    graph
        .neighbors(node)
        .map(|neighbor| coloring.color_of(neighbor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = Color::BLUE;
    const B: Color = Color::RED;

    #[test]
    fn test_single_winner() {
        let w = winners([A, A, A, B, B]).unwrap();
        assert_eq!(w.single(), Some(A));
        assert!(!w.is_tie());
    }

    #[test]
    fn test_tie_is_a_set() {
        let w = winners([A, A, B, B]).unwrap();
        assert!(w.is_tie());
        assert_eq!(w.iter().collect::<Vec<_>>(), vec![A, B]);
        assert_eq!(w.single(), None);
    }

    #[test]
    fn test_three_way_plurality() {
        let w = winners([Color::GREEN, A, B, Color::GREEN, B, Color::YELLOW]).unwrap();
        assert_eq!(w.iter().collect::<Vec<_>>(), vec![B, Color::GREEN]);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let result = winners(Vec::<Color>::new());
        assert!(matches!(result, Err(IllusionError::InvalidInput(_))));
    }

    #[test]
    fn test_quota_winners() {
        let w = determine_quota_winners(&[B, B, B, A], 0.5).unwrap();
        assert!(w.contains(&B));
        assert!(!w.contains(&A));

        // Exactly half does not pass a strict quota.
        let even = determine_quota_winners(&[B, B, A, A], 0.5).unwrap();
        assert!(even.is_empty());

        let low = determine_quota_winners(&[B, B, A, A], 0.25).unwrap();
        assert_eq!(low.len(), 2);

        assert!(determine_quota_winners(&[], 0.5).unwrap().is_empty());
    }

    #[test]
    fn test_quota_bounds() {
        for quota in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            assert!(determine_quota_winners(&[A], quota).is_err());
        }
    }
}
