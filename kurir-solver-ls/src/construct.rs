//! Path-cheapest-arc construction, one arc per step.

use crate::cost::Costs;

/// Greedy tour builder: from the current tail, extend to the cheapest
/// unvisited node, lowest index first on ties.
#[derive(Debug, Clone)]
pub(crate) struct Construction {
    tour: Vec<usize>,
    visited: Vec<bool>,
}

impl Construction {
    pub(crate) fn new(len: usize, start: usize) -> Self {
        let mut visited = vec![false; len];
        if let Some(slot) = visited.get_mut(start) {
            *slot = true;
        }
        let mut tour = Vec::with_capacity(len);
        tour.push(start);
        Self { tour, visited }
    }

    /// Return `true` once every node is on the path.
    pub(crate) fn is_complete(&self) -> bool {
        self.tour.len() >= self.visited.len()
    }

    /// Append the cheapest next arc. Does nothing once complete.
    pub(crate) fn step(&mut self, costs: &Costs) {
        let Some(&tail) = self.tour.last() else {
            return;
        };
        let next = self
            .visited
            .iter()
            .enumerate()
            .filter(|&(_, &seen)| !seen)
            .min_by_key(|&(node, _)| (costs.base(tail, node), node))
            .map(|(node, _)| node);
        if let Some(node) = next {
            if let Some(slot) = self.visited.get_mut(node) {
                *slot = true;
            }
            self.tour.push(node);
        }
    }

    /// Finished path, start first.
    pub(crate) fn into_tour(self) -> Vec<usize> {
        self.tour
    }
}
