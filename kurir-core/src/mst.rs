//! Minimum spanning tree over a distance matrix (Kruskal).
//!
//! The tree is an overlay for multi-drop maps and an informal cost floor: any
//! closed tour over the same points is at least as long as the tree. It never
//! feeds back into tour search.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DistanceMatrix;

/// An accepted tree edge between two matrix indices.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MstEdge {
    /// Lower endpoint index.
    pub a: usize,
    /// Higher endpoint index.
    pub b: usize,
    /// Edge weight in kilometres.
    pub weight_km: f64,
}

/// Edges of a spanning tree in acceptance order with their total weight.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpanningTree {
    /// Accepted edges, lightest first.
    pub edges: Vec<MstEdge>,
    /// Sum of edge weights in kilometres.
    pub total_km: f64,
}

/// Disjoint-set forest with path compression and union by rank.
#[derive(Debug)]
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while let Some(&parent) = self.parent.get(root) {
            if parent == root {
                break;
            }
            root = parent;
        }
        let mut current = node;
        while current != root {
            let Some(slot) = self.parent.get_mut(current) else {
                break;
            };
            let next = *slot;
            *slot = root;
            current = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`; `false` if already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        let rank_a = self.rank.get(root_a).copied().unwrap_or(0);
        let rank_b = self.rank.get(root_b).copied().unwrap_or(0);
        let (high, low) = if rank_a < rank_b {
            (root_b, root_a)
        } else {
            (root_a, root_b)
        };
        if let Some(slot) = self.parent.get_mut(low) {
            *slot = high;
        }
        if rank_a == rank_b
            && let Some(rank) = self.rank.get_mut(high)
        {
            *rank += 1;
        }
        true
    }
}

/// Compute a minimum spanning tree with Kruskal's algorithm.
///
/// Edges `(i, j)` with `i < j` are sorted by weight with a stable sort, so
/// equal weights keep their natural `(i, j)` order and the result is
/// deterministic. A matrix with `n` points yields exactly `n - 1` edges (none
/// for `n <= 1`).
///
/// # Examples
/// ```
/// use kurir_core::{DistanceMatrix, kruskal_mst};
///
/// let matrix = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 4.0],
///     vec![1.0, 0.0, 2.0],
///     vec![4.0, 2.0, 0.0],
/// ])?;
/// let tree = kruskal_mst(&matrix);
/// assert_eq!(tree.edges.len(), 2);
/// assert_eq!(tree.total_km, 3.0);
/// # Ok::<(), kurir_core::MatrixError>(())
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "tree weight is a sum of floating-point edge weights"
)]
pub fn kruskal_mst(matrix: &DistanceMatrix) -> SpanningTree {
    let n = matrix.len();
    let mut candidates: Vec<MstEdge> = (0..n)
        .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
        .filter_map(|(a, b)| matrix.get(a, b).map(|weight_km| MstEdge { a, b, weight_km }))
        .collect();
    candidates.sort_by(|lhs, rhs| lhs.weight_km.total_cmp(&rhs.weight_km));

    let target = n.saturating_sub(1);
    let mut forest = UnionFind::new(n);
    let mut tree = SpanningTree::default();
    for edge in candidates {
        if tree.edges.len() == target {
            break;
        }
        if forest.union(edge.a, edge.b) {
            tree.total_km += edge.weight_km;
            tree.edges.push(edge);
        }
    }
    log::debug!(
        "spanning tree over {n} points: {} edges, {:.3} km",
        tree.edges.len(),
        tree.total_km
    );
    tree
}
