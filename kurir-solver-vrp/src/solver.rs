//! `VrpTourSolver` implementation backed by `vrp-core`.

use std::time::Duration;

use kurir_core::{DistanceMatrix, SolveError, Tour, TourSolver};

use crate::vrp::VrpSolveContext;

/// Configuration for [`VrpTourSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrpTourSolverConfig {
    /// Upper bound on `vrp-core` generations.
    pub max_generations: usize,
}

impl Default for VrpTourSolverConfig {
    fn default() -> Self {
        Self {
            max_generations: 100,
        }
    }
}

/// Fixed-depot tour solver delegating the search to `vrp-core`.
#[derive(Debug, Clone, Default)]
pub struct VrpTourSolver {
    config: VrpTourSolverConfig,
}

impl VrpTourSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpTourSolverConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpTourSolverConfig {
        &self.config
    }
}

impl TourSolver for VrpTourSolver {
    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start: usize,
        budget: Duration,
    ) -> Result<Tour, SolveError> {
        SolveError::check_inputs(matrix, start)?;
        if budget.is_zero() {
            log::warn!("refusing to start vrp-core with a zero time budget");
            return Err(SolveError::NoFeasibleTour);
        }
        if matrix.len() == 1 {
            return Tour::from_order(matrix, start, vec![start, start]);
        }
        let order = VrpSolveContext::new(&self.config).solve(matrix, start, budget)?;
        Tour::from_order(matrix, start, order)
    }
}
