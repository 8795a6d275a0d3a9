//! Fixtures and reference implementations for unit and behaviour tests.
//!
//! The points reproduce a small Cirebon delivery day: a kitchen depot, a
//! single-stop order and a two-stop order.

use std::collections::HashMap;
use std::time::Duration;

use geo::Coord;

use crate::{
    DistanceMatrix, GeocodeError, Geocoder, Order, OrderId, Point, SolveError, Tour, TourSolver,
    lat_lon,
};

/// Depot used throughout the tests.
#[must_use]
pub fn cirebon_depot() -> Point {
    Point::new("Gudang", lat_lon(-6.70, 108.55))
}

/// Order whose customer and destination coincide.
#[must_use]
pub fn single_stop_order() -> Order {
    let home = Point::new("Rumah A", lat_lon(-6.71, 108.56));
    Order {
        id: OrderId::new("order-a"),
        courier: "Dedi".to_owned(),
        customer: home.clone(),
        destination: home,
        item: "Empal gentong".to_owned(),
        price: 30_000.0,
    }
}

/// Order collected at one point and delivered to another.
#[must_use]
pub fn two_stop_order() -> Order {
    Order {
        id: OrderId::new("order-b"),
        courier: "Asep".to_owned(),
        customer: Point::new("Toko B", lat_lon(-6.72, 108.54)),
        destination: Point::new("Tujuan B", lat_lon(-6.73, 108.53)),
        item: "Batik trusmi".to_owned(),
        price: 150_000.0,
    }
}

/// Exhaustive solver used as an optimality oracle.
///
/// Enumerates every ordering of the non-start indices in lexicographic order
/// and keeps the first cheapest. Ignores the budget; keep inputs small.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForceSolver;

impl TourSolver for BruteForceSolver {
    fn solve(
        &self,
        matrix: &DistanceMatrix,
        start: usize,
        _budget: Duration,
    ) -> Result<Tour, SolveError> {
        SolveError::check_inputs(matrix, start)?;
        let mut rest: Vec<usize> = (0..matrix.len()).filter(|&i| i != start).collect();
        let mut best: Option<Tour> = None;
        loop {
            let mut order = Vec::with_capacity(rest.len() + 2);
            order.push(start);
            order.extend_from_slice(&rest);
            order.push(start);
            let tour = Tour::from_order(matrix, start, order)?;
            if best
                .as_ref()
                .is_none_or(|current| tour.total_distance_km < current.total_distance_km)
            {
                best = Some(tour);
            }
            if !next_permutation(&mut rest) {
                break;
            }
        }
        best.ok_or(SolveError::NoFeasibleTour)
    }
}

/// Rearrange `items` into the next lexicographic permutation.
///
/// Returns `false` once the last permutation has been reached.
fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items
        .windows(2)
        .rposition(|pair| matches!(pair, [a, b] if a < b))
    else {
        return false;
    };
    let Some(&pivot_value) = items.get(pivot) else {
        return false;
    };
    let Some(successor) = items.iter().rposition(|&value| value > pivot_value) else {
        return false;
    };
    items.swap(pivot, successor);
    if let Some(tail) = items.get_mut(pivot + 1..) {
        tail.reverse();
    }
    true
}

/// Solver that never finds a tour.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSolver;

impl TourSolver for FailingSolver {
    fn solve(
        &self,
        _matrix: &DistanceMatrix,
        _start: usize,
        _budget: Duration,
    ) -> Result<Tour, SolveError> {
        Err(SolveError::NoFeasibleTour)
    }
}

/// In-memory [`Geocoder`] keyed by exact address text.
#[derive(Debug, Default, Clone)]
pub struct MemoryGeocoder {
    addresses: HashMap<String, Coord<f64>>,
    outage: Option<String>,
}

impl MemoryGeocoder {
    /// Register an address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>, location: Coord<f64>) -> Self {
        self.addresses.insert(address.into(), location);
        self
    }

    /// Fail every lookup with [`GeocodeError::Transient`].
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            addresses: HashMap::new(),
            outage: Some(message.into()),
        }
    }
}

impl Geocoder for MemoryGeocoder {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        if let Some(message) = &self.outage {
            return Err(GeocodeError::Transient(message.clone()));
        }
        self.addresses
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(address.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn permutations_are_lexicographic() {
        let mut items = vec![1, 2, 3];
        let mut seen = vec![items.clone()];
        while next_permutation(&mut items) {
            seen.push(items.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
    }

    #[rstest]
    fn brute_force_finds_the_short_way_round() {
        // Visiting 2 before 1 avoids the long 0-2 edge twice.
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 9.0, 1.0],
            vec![1.0, 0.0, 1.0, 9.0],
            vec![9.0, 1.0, 0.0, 1.0],
            vec![1.0, 9.0, 1.0, 0.0],
        ])
        .expect("valid matrix");
        let tour = BruteForceSolver
            .solve(&matrix, 0, Duration::ZERO)
            .expect("tour");
        assert_eq!(tour.visit_order, vec![0, 1, 2, 3, 0]);
        assert_eq!(tour.total_distance_km, 4.0);
    }

    #[rstest]
    fn unavailable_geocoder_reports_transient_errors() {
        let geocoder = MemoryGeocoder::unavailable("offline");
        assert_eq!(
            geocoder.resolve("anything"),
            Err(GeocodeError::Transient("offline".to_owned()))
        );
    }
}
