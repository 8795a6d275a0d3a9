//! `vrp-core` modelling helpers for `VrpTourSolver`.
//!
//! This module converts a distance matrix into a single-vehicle `vrp-core`
//! problem, runs the solver, and translates the resulting tour back into a
//! visiting order over matrix indices.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use kurir_core::{DistanceMatrix, SolveError};
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

use crate::solver::VrpTourSolverConfig;

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

struct ProblemSpec {
    start: Location,
    len: usize,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
}

fn define_problem(spec: ProblemSpec) -> GenericResult<Problem> {
    let ProblemSpec {
        start,
        len,
        transport,
        goal,
    } = spec;

    let jobs = (0..len)
        .filter(|&location| location != start)
        .map(|location| {
            SingleBuilder::default()
                .id(format!("stop{location}").as_str())
                .location(location)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = VehicleBuilder::default()
        .id("courier")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(start)
                .set_end_location(start)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Metre distances read straight from a [`DistanceMatrix`].
struct MatrixTransportCost {
    meters: Vec<Vec<f64>>,
}

impl MatrixTransportCost {
    #[expect(clippy::float_arithmetic, reason = "kilometres to metres")]
    fn new(matrix: &DistanceMatrix) -> Self {
        let meters = matrix
            .rows()
            .iter()
            .map(|row| row.iter().map(|km| km * 1000.0).collect())
            .collect();
        Self { meters }
    }

    fn meters(&self, from: Location, to: Location) -> f64 {
        let result = self.meters.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "Matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(0.0)
    }
}

impl TransportCost for MatrixTransportCost {
    // Route and departure are part of the shared trait signature; a static
    // matrix ignores both.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.meters(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.meters(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.meters(from, to)
    }
}

fn backend(err: impl Display) -> SolveError {
    SolveError::Backend(err.to_string())
}

/// Context for running a `vrp-core` solve over one matrix.
pub(super) struct VrpSolveContext<'a> {
    config: &'a VrpTourSolverConfig,
}

impl<'a> VrpSolveContext<'a> {
    /// Create a new solve context.
    pub(super) const fn new(config: &'a VrpTourSolverConfig) -> Self {
        Self { config }
    }

    /// Solve the tour and return the visiting order, start first and last.
    pub(super) fn solve(
        &self,
        matrix: &DistanceMatrix,
        start: usize,
        budget: Duration,
    ) -> Result<Vec<usize>, SolveError> {
        let transport = Arc::new(MatrixTransportCost::new(matrix));
        let goal = define_goal(transport.clone()).map_err(backend)?;
        let problem = Arc::new(
            define_problem(ProblemSpec {
                start,
                len: matrix.len(),
                transport,
                goal,
            })
            .map_err(backend)?,
        );

        let max_seconds = usize::try_from(budget.as_secs())
            .unwrap_or(usize::MAX)
            .max(1);
        let vrp_config = VrpConfigBuilder::new(problem.clone())
            .prebuild()
            .map_err(backend)?
            .with_max_time(Some(max_seconds))
            .with_max_generations(Some(self.config.max_generations))
            .build()
            .map_err(backend)?;

        let solution = vrp_core::solver::Solver::new(problem, vrp_config)
            .solve()
            .map_err(backend)?;

        if !solution.unassigned.is_empty() {
            log::warn!(
                "vrp-core left {} of {} stops unassigned",
                solution.unassigned.len(),
                matrix.len().saturating_sub(1)
            );
            return Err(SolveError::NoFeasibleTour);
        }

        let mut order = Vec::with_capacity(matrix.len() + 1);
        order.push(start);
        order.extend(
            solution
                .get_locations()
                .flatten()
                .filter(|&location| location != start),
        );
        order.push(start);
        Ok(order)
    }
}
