//! Fixed-depot tour search contract.

use std::time::Duration;

use thiserror::Error;

use crate::DistanceMatrix;

/// A closed tour over every matrix index.
///
/// `visit_order` begins and ends with the start index and lists every other
/// index exactly once in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Matrix indices in visiting order, start repeated at the end.
    pub visit_order: Vec<usize>,
    /// Total length in kilometres.
    pub total_distance_km: f64,
}

impl Tour {
    /// Build a tour from a visiting order, measuring it on `matrix`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::NoFeasibleTour`] unless `visit_order` is a
    /// closed permutation of every index that starts and ends at `start`.
    pub fn from_order(
        matrix: &DistanceMatrix,
        start: usize,
        visit_order: Vec<usize>,
    ) -> Result<Self, SolveError> {
        if !is_closed_permutation(&visit_order, start, matrix.len()) {
            return Err(SolveError::NoFeasibleTour);
        }
        let total_distance_km = matrix
            .path_km(&visit_order)
            .ok_or(SolveError::NoFeasibleTour)?;
        Ok(Self {
            visit_order,
            total_distance_km,
        })
    }
}

/// Return `true` when `order` is `start`, every other index of `0..len`
/// once, then `start` again.
#[must_use]
pub fn is_closed_permutation(order: &[usize], start: usize, len: usize) -> bool {
    if order.len() != len + 1 || order.first() != Some(&start) || order.last() != Some(&start) {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order.iter().take(len) {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Errors returned by [`TourSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The matrix covered no points.
    #[error("distance matrix is empty")]
    EmptyMatrix,
    /// The start index was outside the matrix.
    #[error("start index {start} is outside a matrix of {len} points")]
    StartOutOfRange {
        /// Requested start index.
        start: usize,
        /// Number of points in the matrix.
        len: usize,
    },
    /// No complete tour was found inside the time budget.
    #[error("no feasible tour found within the time budget")]
    NoFeasibleTour,
    /// The backing optimiser rejected the model.
    #[error("solver backend failed: {0}")]
    Backend(String),
}

impl SolveError {
    /// Check the inputs shared by every solver.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::EmptyMatrix`] or [`SolveError::StartOutOfRange`].
    pub fn check_inputs(matrix: &DistanceMatrix, start: usize) -> Result<(), Self> {
        if matrix.is_empty() {
            return Err(Self::EmptyMatrix);
        }
        if start >= matrix.len() {
            return Err(Self::StartOutOfRange {
                start,
                len: matrix.len(),
            });
        }
        Ok(())
    }
}

/// Find a low-cost closed tour from a fixed start index.
///
/// Implementations visit every index exactly once and return to `start`,
/// finishing within `budget` of wall-clock time. Failure to produce any
/// complete tour in time is reported as [`SolveError::NoFeasibleTour`] rather
/// than retried. Solvers must be `Send + Sync` so hosts can share them across
/// threads.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kurir_core::{DistanceMatrix, SolveError, Tour, TourSolver};
///
/// /// Visits indices in ascending order.
/// struct InOrder;
///
/// impl TourSolver for InOrder {
///     fn solve(
///         &self,
///         matrix: &DistanceMatrix,
///         start: usize,
///         _budget: Duration,
///     ) -> Result<Tour, SolveError> {
///         SolveError::check_inputs(matrix, start)?;
///         let mut order = vec![start];
///         order.extend((0..matrix.len()).filter(|&i| i != start));
///         order.push(start);
///         Tour::from_order(matrix, start, order)
///     }
/// }
///
/// let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]])?;
/// let tour = InOrder.solve(&matrix, 0, Duration::from_secs(1))?;
/// assert_eq!(tour.visit_order, vec![0, 1, 0]);
/// assert_eq!(tour.total_distance_km, 4.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait TourSolver: Send + Sync {
    /// Solve for a tour starting and ending at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] for invalid inputs or when no tour is found in
    /// time.
    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start: usize,
        budget: Duration,
    ) -> Result<Tour, SolveError>;
}

impl<T: TourSolver + ?Sized> TourSolver for Box<T> {
    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start: usize,
        budget: Duration,
    ) -> Result<Tour, SolveError> {
        (**self).solve(matrix, start, budget)
    }
}
