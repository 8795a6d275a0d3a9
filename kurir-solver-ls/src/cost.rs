//! Integer edge costs with guided-local-search penalties.
//!
//! Costs are whole metres summed over both directions of an edge, so the
//! search works on a symmetric integer matrix even when the caller's matrix
//! is not. Every comparison inside the search happens on these values.

use kurir_core::DistanceMatrix;

/// Symmetric metre costs plus per-edge penalties.
#[derive(Debug, Clone)]
pub(crate) struct Costs {
    n: usize,
    base: Vec<u64>,
    penalties: Vec<u64>,
    lambda: u64,
}

impl Costs {
    pub(crate) fn new(matrix: &DistanceMatrix) -> Self {
        let meters = matrix.to_meters();
        let n = meters.len();
        let leg = |from: usize, to: usize| {
            meters
                .get(from)
                .and_then(|row| row.get(to))
                .copied()
                .unwrap_or_default()
        };
        let base = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| leg(i, j).saturating_add(leg(j, i)))
            .collect();
        Self {
            n,
            base,
            penalties: vec![0; n * n],
            lambda: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.n
    }

    const fn slot(&self, from: usize, to: usize) -> usize {
        from * self.n + to
    }

    /// Undistorted cost of the edge.
    pub(crate) fn base(&self, from: usize, to: usize) -> u64 {
        self.base
            .get(self.slot(from, to))
            .copied()
            .unwrap_or_default()
    }

    fn penalty(&self, from: usize, to: usize) -> u64 {
        self.penalties
            .get(self.slot(from, to))
            .copied()
            .unwrap_or_default()
    }

    /// Cost seen by the descent: base plus `lambda * penalty`.
    pub(crate) fn augmented(&self, from: usize, to: usize) -> u64 {
        self.base(from, to)
            .saturating_add(self.lambda.saturating_mul(self.penalty(from, to)))
    }

    /// Undistorted cost of the closed cycle through `tour`.
    pub(crate) fn tour_cost(&self, tour: &[usize]) -> u64 {
        cycle_edges(tour)
            .map(|(from, to)| self.base(from, to))
            .fold(0, u64::saturating_add)
    }

    /// Fix lambda from the first local optimum as
    /// `alpha_permille * cost / (1000 * n)`, at least one.
    pub(crate) fn calibrate(&mut self, local_optimum: u64, alpha_permille: u64) {
        if self.lambda != 0 {
            return;
        }
        let scale = u64::try_from(self.n).unwrap_or(u64::MAX).saturating_mul(1000);
        self.lambda = local_optimum
            .saturating_mul(alpha_permille)
            .checked_div(scale)
            .unwrap_or(0)
            .max(1);
        log::debug!("guided local search lambda set to {}", self.lambda);
    }

    /// Penalise every tour edge with maximal utility `cost / (1 + penalty)`.
    ///
    /// Returns the number of edges penalised.
    pub(crate) fn penalise(&mut self, tour: &[usize]) -> usize {
        let utility = |costs: &Self, edge: (usize, usize)| {
            (
                u128::from(costs.base(edge.0, edge.1)),
                u128::from(costs.penalty(edge.0, edge.1)) + 1,
            )
        };
        let mut best: Option<(u128, u128)> = None;
        for edge in cycle_edges(tour) {
            let (cost, weight) = utility(self, edge);
            // a/b > c/d  <=>  a*d > c*b for positive denominators.
            if best.is_none_or(|(top_cost, top_weight)| cost * top_weight > top_cost * weight) {
                best = Some((cost, weight));
            }
        }
        let Some((top_cost, top_weight)) = best else {
            return 0;
        };
        let chosen: Vec<(usize, usize)> = cycle_edges(tour)
            .filter(|&edge| {
                let (cost, weight) = utility(self, edge);
                cost * top_weight == top_cost * weight
            })
            .collect();
        for &(from, to) in &chosen {
            for slot in [self.slot(from, to), self.slot(to, from)] {
                if let Some(penalty) = self.penalties.get_mut(slot) {
                    *penalty = penalty.saturating_add(1);
                }
            }
        }
        chosen.len()
    }
}

/// Edges of the closed cycle through `tour`, including the closing edge.
pub(crate) fn cycle_edges(tour: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    tour.iter()
        .copied()
        .zip(tour.iter().copied().cycle().skip(1))
}
