//! [`TourSolver`] implementation over [`LocalSearch`].

use std::time::Duration;

use kurir_core::{DistanceMatrix, SolveError, Tour, TourSolver};

use crate::clock::{Clock, SystemClock};
use crate::search::{LocalSearch, SearchState};

/// Configuration for [`LocalSearchSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchConfig {
    /// Penalty rounds without a new best tour before the search converges.
    pub max_stale_rounds: usize,
    /// Guided local search `alpha`, in thousandths.
    pub gls_alpha_permille: u64,
    /// Longest segment relocated by or-opt.
    pub or_opt_max_segment: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            max_stale_rounds: 50,
            gls_alpha_permille: 300,
            or_opt_max_segment: 3,
        }
    }
}

/// Native fixed-depot tour solver.
///
/// Builds a path-cheapest-arc tour and improves it with 2-opt and or-opt
/// under guided local search until it converges or the budget runs out.
/// With [`SystemClock`] and a budget long enough to converge, the result is
/// deterministic for a given matrix.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kurir_core::{DistanceMatrix, TourSolver};
/// use kurir_solver_ls::LocalSearchSolver;
///
/// let matrix = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 1.5, 1.0],
///     vec![1.0, 0.0, 1.0, 1.5],
///     vec![1.5, 1.0, 0.0, 1.0],
///     vec![1.0, 1.5, 1.0, 0.0],
/// ])?;
/// let tour = LocalSearchSolver::default().solve(&matrix, 0, Duration::from_secs(1))?;
/// assert_eq!(tour.visit_order.first(), Some(&0));
/// assert_eq!(tour.visit_order.last(), Some(&0));
/// assert_eq!(tour.total_distance_km, 4.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct LocalSearchSolver<C = SystemClock> {
    clock: C,
    config: LocalSearchConfig,
}

impl LocalSearchSolver {
    /// Construct a wall-clock solver with explicit configuration.
    #[must_use]
    pub fn new(config: LocalSearchConfig) -> Self {
        Self::with_clock(SystemClock::default(), config)
    }
}

impl Default for LocalSearchSolver {
    fn default() -> Self {
        Self::new(LocalSearchConfig::default())
    }
}

impl<C: Clock> LocalSearchSolver<C> {
    /// Construct a solver reading time from `clock`.
    #[must_use]
    pub const fn with_clock(clock: C, config: LocalSearchConfig) -> Self {
        Self { clock, config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LocalSearchConfig {
        &self.config
    }
}

impl<C: Clock> TourSolver for LocalSearchSolver<C> {
    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start: usize,
        budget: Duration,
    ) -> Result<Tour, SolveError> {
        let outcome = LocalSearch::new(matrix, start, budget, &self.clock, &self.config)?.run();
        let Some(mut order) = outcome.best else {
            log::warn!(
                "time budget of {budget:?} expired before a tour over {} points was built",
                matrix.len()
            );
            return Err(SolveError::NoFeasibleTour);
        };
        if outcome.stopped_by == SearchState::TimeExpired {
            log::debug!("returning best tour found within {budget:?}");
        }
        order.push(start);
        Tour::from_order(matrix, start, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TickClock;
    use rstest::rstest;

    fn line(n: u32) -> DistanceMatrix {
        let rows = (0..n)
            .map(|a| (0..n).map(|b| f64::from(a.abs_diff(b))).collect())
            .collect();
        DistanceMatrix::from_rows(rows).expect("valid matrix")
    }

    #[rstest]
    #[case::single(1, vec![0, 0])]
    #[case::pair(2, vec![0, 1, 0])]
    fn tiny_inputs_use_the_same_path(#[case] n: u32, #[case] expected: Vec<usize>) {
        let tour = LocalSearchSolver::default()
            .solve(&line(n), 0, Duration::from_secs(1))
            .expect("tour");
        assert_eq!(tour.visit_order, expected);
    }

    #[rstest]
    fn start_need_not_be_zero() {
        let tour = LocalSearchSolver::default()
            .solve(&line(5), 2, Duration::from_secs(1))
            .expect("tour");
        assert_eq!(tour.visit_order.first(), Some(&2));
        assert_eq!(tour.visit_order.last(), Some(&2));
        assert_eq!(tour.total_distance_km, 8.0);
    }

    #[rstest]
    fn zero_budget_reports_no_feasible_tour() {
        let err = LocalSearchSolver::default()
            .solve(&line(4), 0, Duration::ZERO)
            .expect_err("no time to build a tour");
        assert_eq!(err, SolveError::NoFeasibleTour);
    }

    #[rstest]
    fn expired_budget_still_returns_the_best_tour() {
        let clock = TickClock::new(Duration::from_millis(1));
        let solver = LocalSearchSolver::with_clock(clock, LocalSearchConfig::default());
        let tour = solver
            .solve(&line(4), 0, Duration::from_millis(10))
            .expect("construction fits the budget");
        assert_eq!(tour.visit_order.len(), 5);
    }

    #[rstest]
    fn default_solver_reads_the_wall_clock() {
        let solver = LocalSearchSolver::default();
        assert_eq!(solver.config(), &LocalSearchConfig::default());
        let boxed: Box<dyn TourSolver> = Box::new(LocalSearchSolver::default());
        let tour = boxed
            .solve(&line(3), 0, Duration::from_secs(1))
            .expect("tour");
        assert_eq!(tour.visit_order.len(), 4);
    }

    #[rstest]
    fn empty_matrix_is_rejected() {
        let empty = DistanceMatrix::from_rows(Vec::new()).expect("empty matrix");
        let err = LocalSearchSolver::default()
            .solve(&empty, 0, Duration::from_secs(1))
            .expect_err("empty matrix");
        assert_eq!(err, SolveError::EmptyMatrix);
    }
}
