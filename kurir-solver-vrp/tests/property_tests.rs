//! Property-based tests for the `vrp-core` tour solver.
//!
//! # Invariants tested
//!
//! - **Closed permutation:** tours start and end at the depot and visit every
//!   other point once.
//! - **Lower bound:** no tour beats exhaustive search.

use std::time::Duration;

use kurir_core::test_support::BruteForceSolver;
use kurir_core::{DistanceMatrix, Point, Region, TourSolver, is_closed_permutation, lat_lon};
use kurir_solver_vrp::VrpTourSolver;
use proptest::prelude::*;

const TOLERANCE_KM: f64 = 1e-6;

fn points_strategy(max: usize) -> impl Strategy<Value = Vec<Point>> {
    let (lat_min, lat_max) = Region::CIREBON_LAT;
    let (lon_min, lon_max) = Region::CIREBON_LON;
    prop::collection::vec((lat_min..=lat_max, lon_min..=lon_max), 2..=max).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lon))| Point::new(format!("P{i}"), lat_lon(lat, lon)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Property: tours are valid and never undercut the optimum.
    #[test]
    #[expect(clippy::float_arithmetic, reason = "tolerance on tour length")]
    fn tours_are_valid_and_bounded(points in points_strategy(6)) {
        let matrix = DistanceMatrix::build(&points);
        let tour = VrpTourSolver::new()
            .solve(&matrix, 0, Duration::from_secs(2))
            .map_err(|err| TestCaseError::fail(format!("vrp solve failed: {err}")))?;
        let optimal = BruteForceSolver
            .solve(&matrix, 0, Duration::from_secs(2))
            .map_err(|err| TestCaseError::fail(format!("brute force failed: {err}")))?;
        prop_assert!(is_closed_permutation(&tour.visit_order, 0, points.len()));
        prop_assert!(tour.total_distance_km + TOLERANCE_KM >= optimal.total_distance_km);
    }
}
