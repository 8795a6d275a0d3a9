//! Guided local search as an explicit state machine.
//!
//! ```text
//! Constructing -> Improving -> Converged   -> Done
//!      |              |                        ^
//!      +--------------+----> TimeExpired ------+
//! ```
//!
//! Each call to [`LocalSearch::step`] performs one unit of work: one
//! construction arc, one improving move, or one penalty round. The clock is
//! read before every unit, so termination depends only on the clock and the
//! convergence rule, never on tour quality.

use std::time::Duration;

use kurir_core::{DistanceMatrix, SolveError};

use crate::LocalSearchConfig;
use crate::clock::{Clock, Deadline};
use crate::construct::Construction;
use crate::cost::Costs;
use crate::moves::{apply, first_improving};

/// Phase of a [`LocalSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Building the initial tour one arc at a time.
    Constructing,
    /// Descending on the penalised cost and penalising local optima.
    Improving,
    /// Too many penalty rounds passed without a new best tour.
    Converged,
    /// The budget ran out.
    TimeExpired,
    /// Terminal; no further work happens.
    Done,
}

/// Final report of a [`LocalSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Best tour found as a permutation starting at the start index, without
    /// the closing return. `None` if construction never finished.
    pub best: Option<Vec<usize>>,
    /// Cost of `best` in internal units (metres over both directions).
    pub best_cost: Option<u64>,
    /// Why the search stopped: [`SearchState::Converged`] or
    /// [`SearchState::TimeExpired`].
    pub stopped_by: SearchState,
    /// Penalty rounds completed.
    pub rounds: usize,
}

/// One fixed-start tour search bounded by a clock.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kurir_core::DistanceMatrix;
/// use kurir_solver_ls::{LocalSearch, LocalSearchConfig, SearchState, SystemClock};
///
/// let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]])?;
/// let clock = SystemClock::default();
/// let config = LocalSearchConfig::default();
/// let mut search = LocalSearch::new(&matrix, 0, Duration::from_secs(1), &clock, &config)?;
/// assert_eq!(search.state(), SearchState::Constructing);
/// let outcome = search.run();
/// assert_eq!(outcome.best, Some(vec![0, 1]));
/// assert_eq!(outcome.stopped_by, SearchState::Converged);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LocalSearch<'a> {
    costs: Costs,
    clock: &'a dyn Clock,
    deadline: Deadline,
    config: &'a LocalSearchConfig,
    state: SearchState,
    construction: Option<Construction>,
    current: Vec<usize>,
    best: Option<(u64, Vec<usize>)>,
    stale_rounds: usize,
    rounds: usize,
    stopped_by: Option<SearchState>,
}

impl<'a> LocalSearch<'a> {
    /// Prepare a search; the budget starts counting now.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::EmptyMatrix`] or [`SolveError::StartOutOfRange`].
    pub fn new(
        matrix: &DistanceMatrix,
        start: usize,
        budget: Duration,
        clock: &'a dyn Clock,
        config: &'a LocalSearchConfig,
    ) -> Result<Self, SolveError> {
        SolveError::check_inputs(matrix, start)?;
        let costs = Costs::new(matrix);
        let construction = Construction::new(costs.len(), start);
        Ok(Self {
            costs,
            clock,
            deadline: Deadline::start(clock, budget),
            config,
            state: SearchState::Constructing,
            construction: Some(construction),
            current: Vec::new(),
            best: None,
            stale_rounds: 0,
            rounds: 0,
            stopped_by: None,
        })
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.state
    }

    /// Perform one unit of work and return the resulting phase.
    pub fn step(&mut self) -> SearchState {
        let current = self.state;
        self.state = match current {
            SearchState::Constructing | SearchState::Improving
                if self.deadline.expired(self.clock) =>
            {
                self.stop(SearchState::TimeExpired)
            }
            SearchState::Constructing => self.construct(),
            SearchState::Improving => self.improve(),
            SearchState::Converged | SearchState::TimeExpired | SearchState::Done => {
                SearchState::Done
            }
        };
        self.state
    }

    /// Step until [`SearchState::Done`] and report the best tour.
    #[must_use]
    pub fn run(mut self) -> SearchOutcome {
        while self.step() != SearchState::Done {}
        let (best_cost, best) = self.best.map_or((None, None), |(cost, tour)| {
            (Some(cost), Some(tour))
        });
        let stopped_by = self.stopped_by.unwrap_or(SearchState::Converged);
        log::debug!(
            "local search stopped by {stopped_by:?} after {} rounds, best cost {best_cost:?}",
            self.rounds
        );
        SearchOutcome {
            best,
            best_cost,
            stopped_by,
            rounds: self.rounds,
        }
    }

    fn stop(&mut self, reason: SearchState) -> SearchState {
        self.stopped_by = Some(reason);
        reason
    }

    fn construct(&mut self) -> SearchState {
        let Some(construction) = self.construction.as_mut() else {
            return self.stop(SearchState::TimeExpired);
        };
        construction.step(&self.costs);
        if !construction.is_complete() {
            return SearchState::Constructing;
        }
        let tour = self
            .construction
            .take()
            .map(Construction::into_tour)
            .unwrap_or_default();
        let cost = self.costs.tour_cost(&tour);
        log::debug!("initial tour built, cost {cost}");
        self.best = Some((cost, tour.clone()));
        self.current = tour;
        SearchState::Improving
    }

    fn improve(&mut self) -> SearchState {
        if let Some(mv) = first_improving(&self.current, &self.costs, self.config.or_opt_max_segment)
        {
            apply(&mut self.current, mv);
            self.record_if_best();
            return SearchState::Improving;
        }

        // Local optimum of the penalised cost: close the round.
        self.rounds += 1;
        if !self.record_if_best() {
            self.stale_rounds += 1;
        }
        if self.stale_rounds >= self.config.max_stale_rounds {
            return self.stop(SearchState::Converged);
        }
        let local_optimum = self.costs.tour_cost(&self.current);
        self.costs
            .calibrate(local_optimum, self.config.gls_alpha_permille);
        self.costs.penalise(&self.current);
        SearchState::Improving
    }

    /// Keep the current tour if it beats the best so far.
    fn record_if_best(&mut self) -> bool {
        let cost = self.costs.tour_cost(&self.current);
        if self.best.as_ref().is_some_and(|(best, _)| cost >= *best) {
            return false;
        }
        log::debug!("new best tour, cost {cost}");
        self.best = Some((cost, self.current.clone()));
        self.stale_rounds = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{SystemClock, TickClock};
    use rstest::{fixture, rstest};

    #[fixture]
    fn square() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 1.5, 1.0],
            vec![1.0, 0.0, 1.0, 1.5],
            vec![1.5, 1.0, 0.0, 1.0],
            vec![1.0, 1.5, 1.0, 0.0],
        ])
        .expect("valid matrix")
    }

    #[rstest]
    fn passes_through_every_phase(square: DistanceMatrix) {
        let clock = SystemClock::default();
        let config = LocalSearchConfig::default();
        let mut search = LocalSearch::new(&square, 0, Duration::from_secs(60), &clock, &config)
            .expect("valid inputs");
        let mut seen = vec![search.state()];
        loop {
            let state = search.step();
            if seen.last() != Some(&state) {
                seen.push(state);
            }
            if state == SearchState::Done {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                SearchState::Constructing,
                SearchState::Improving,
                SearchState::Converged,
                SearchState::Done,
            ]
        );
    }

    #[rstest]
    fn exhausted_budget_stops_construction(square: DistanceMatrix) {
        let clock = TickClock::new(Duration::from_millis(1));
        let config = LocalSearchConfig::default();
        let outcome = LocalSearch::new(&square, 0, Duration::from_millis(2), &clock, &config)
            .expect("valid inputs")
            .run();
        assert_eq!(outcome.stopped_by, SearchState::TimeExpired);
        assert_eq!(outcome.best, None);
    }

    #[rstest]
    fn budget_expiry_keeps_the_constructed_tour(square: DistanceMatrix) {
        // Three construction arcs fit; the first improvement check expires.
        let clock = TickClock::new(Duration::from_millis(1));
        let config = LocalSearchConfig::default();
        let outcome = LocalSearch::new(&square, 0, Duration::from_millis(4), &clock, &config)
            .expect("valid inputs")
            .run();
        assert_eq!(outcome.stopped_by, SearchState::TimeExpired);
        assert_eq!(outcome.best, Some(vec![0, 1, 2, 3]));
        assert_eq!(outcome.rounds, 0);
    }

    #[rstest]
    fn convergence_needs_the_configured_stale_rounds(square: DistanceMatrix) {
        let clock = SystemClock::default();
        let config = LocalSearchConfig {
            max_stale_rounds: 3,
            ..LocalSearchConfig::default()
        };
        let outcome = LocalSearch::new(&square, 0, Duration::from_secs(60), &clock, &config)
            .expect("valid inputs")
            .run();
        assert_eq!(outcome.stopped_by, SearchState::Converged);
        assert!(outcome.rounds >= 3);
        assert_eq!(outcome.best_cost, Some(8000));
    }

    #[rstest]
    fn done_is_terminal(square: DistanceMatrix) {
        let clock = TickClock::new(Duration::from_millis(1));
        let config = LocalSearchConfig::default();
        let mut search = LocalSearch::new(&square, 0, Duration::ZERO, &clock, &config)
            .expect("valid inputs");
        assert_eq!(search.step(), SearchState::TimeExpired);
        assert_eq!(search.step(), SearchState::Done);
        assert_eq!(search.step(), SearchState::Done);
    }

    #[rstest]
    fn invalid_start_is_rejected(square: DistanceMatrix) {
        let clock = SystemClock::default();
        let config = LocalSearchConfig::default();
        let err = LocalSearch::new(&square, 4, Duration::from_secs(1), &clock, &config)
            .err()
            .expect("start out of range");
        assert_eq!(err, SolveError::StartOutOfRange { start: 4, len: 4 });
    }
}
