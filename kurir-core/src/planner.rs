//! Route aggregation over a pluggable [`TourSolver`].
//!
//! [`RoutePlanner`] owns the map from [`RouteKey`] to the last route solved
//! for it. Inputs are assumed region-validated; geocoding and validation
//! happen in the calling layer (see [`crate::OrderBook`]).

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::time::Duration;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    DistanceMatrix, Order, Point, Route, RouteKey, SolveError, Tour, TourSolver, kruskal_mst,
};

/// Index of the depot in every point list handed to the solver.
const DEPOT: usize = 0;

/// Configuration for [`RoutePlanner`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Constant average driving speed used for travel times.
    pub average_speed_kmh: f64,
    /// Wall-clock budget handed to the tour solver per solve.
    pub time_budget: Duration,
    /// Maximum legs in a multi-drop tour, the return to the depot included,
    /// so at most `max_stops - 1` drop points fit. `None` disables the cap.
    pub max_stops: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 30.0,
            time_budget: Duration::from_secs(10),
            max_stops: Some(10),
        }
    }
}

impl PlannerConfig {
    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] for a non-positive or non-finite
    /// speed, or a stop cap below two.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh <= 0.0 {
            return Err(PlanError::InvalidConfig(
                "average speed must be finite and positive",
            ));
        }
        if self.max_stops.is_some_and(|max| max < 2) {
            return Err(PlanError::InvalidConfig("stop cap must be at least two"));
        }
        Ok(())
    }
}

/// Errors returned by [`RoutePlanner`] solve entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A solve was requested before a depot was set.
    #[error("no depot set")]
    NoDepot,
    /// A multi-drop solve had fewer than two points including the depot.
    #[error("multi-drop needs at least two points, found {found}")]
    InsufficientPoints {
        /// Points found, depot included.
        found: usize,
    },
    /// A multi-drop solve needs more legs than the configured stop cap.
    #[error("multi-drop has {stops} drop points, more than a {max}-leg stop cap allows")]
    TooManyStops {
        /// Drop points requested.
        stops: usize,
        /// Configured cap, in legs.
        max: usize,
    },
    /// The tour solver failed.
    #[error("solve failed: {0}")]
    SolveFailed(#[from] SolveError),
    /// The planner configuration was rejected.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Solves and stores per-order and multi-drop routes.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kurir_core::{
///     DistanceMatrix, Order, OrderDraft, Point, RouteKey, RoutePlanner, SolveError, Tour,
///     TourSolver, lat_lon,
/// };
///
/// struct InOrder;
///
/// impl TourSolver for InOrder {
///     fn solve(&self, m: &DistanceMatrix, start: usize, _: Duration) -> Result<Tour, SolveError> {
///         let mut order: Vec<usize> = (0..m.len()).collect();
///         order.push(start);
///         Tour::from_order(m, start, order)
///     }
/// }
///
/// let depot = Point::new("Gudang", lat_lon(-6.70, 108.55));
/// let home = Point::new("Bu Siti", lat_lon(-6.71, 108.56));
/// let order = Order::new(OrderDraft {
///     id: None,
///     courier: "Dedi".into(),
///     customer: home.clone(),
///     destination: home,
///     item: "Nasi jamblang".into(),
///     price: 25_000.0,
/// })?;
///
/// let mut planner = RoutePlanner::new(InOrder);
/// let route = planner.solve_for_order(Some(&depot), &order)?;
/// assert_eq!(route.visit_order, vec![0, 1, 0]);
/// assert!(planner.route(&RouteKey::Order(order.id.clone())).is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RoutePlanner<S> {
    solver: S,
    config: PlannerConfig,
    routes: BTreeMap<RouteKey, Route>,
}

impl<S: TourSolver> RoutePlanner<S> {
    /// Construct a planner with the default configuration.
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            config: PlannerConfig::default(),
            routes: BTreeMap::new(),
        }
    }

    /// Construct a planner with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] when `config` fails validation.
    pub fn with_config(solver: S, config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            solver,
            config,
            routes: BTreeMap::new(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Solve the route for one order and store it under its id.
    ///
    /// Single-stop orders produce `[depot, destination]`; otherwise the
    /// point list is `[depot, customer, destination]`. Any earlier route for
    /// the same order is replaced. A failed solve leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoDepot`] without a depot and
    /// [`PlanError::SolveFailed`] when the solver finds no tour or returns
    /// one that does not visit every point once from the depot and back.
    pub fn solve_for_order(
        &mut self,
        depot: Option<&Point>,
        order: &Order,
    ) -> Result<&Route, PlanError> {
        let key = RouteKey::Order(order.id.clone());
        let origin = depot.ok_or(PlanError::NoDepot).inspect_err(|err| {
            log::error!("cannot solve {key}: {err}");
        })?;
        let mut points = Vec::with_capacity(3);
        points.push(origin.clone());
        points.extend(order.stops());
        let (_, route) = self.solve_points(&key, points)?;
        Ok(self.store(key, route))
    }

    /// Solve one tour over the depot and every distinct drop point.
    ///
    /// The spanning tree of the same matrix is attached to the stored route.
    /// Any earlier multi-drop route is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoDepot`], [`PlanError::InsufficientPoints`] when
    /// no drop point is given, [`PlanError::TooManyStops`] above the stop cap,
    /// or [`PlanError::SolveFailed`].
    pub fn solve_multi_drop(
        &mut self,
        depot: Option<&Point>,
        points: &[Point],
    ) -> Result<&Route, PlanError> {
        let key = RouteKey::MultiDrop;
        let origin = self
            .check_multi_drop(depot, points)
            .inspect_err(|err| log::error!("cannot solve {key}: {err}"))?;
        let mut all = Vec::with_capacity(points.len() + 1);
        all.push(origin.clone());
        all.extend_from_slice(points);
        let (matrix, route) = self.solve_points(&key, all)?;
        let tree = kruskal_mst(&matrix);
        Ok(self.store(key, route.with_mst(tree)))
    }

    /// Route previously solved for `key`.
    #[must_use]
    pub fn route(&self, key: &RouteKey) -> Option<&Route> {
        self.routes.get(key)
    }

    /// Iterate every stored route with its key.
    ///
    /// Order routes come first, sorted by id, followed by the multi-drop
    /// route when one is stored.
    pub fn routes(&self) -> impl Iterator<Item = (&RouteKey, &Route)> {
        self.routes.iter()
    }

    /// Number of stored routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` when no route is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn check_multi_drop<'a>(
        &self,
        depot: Option<&'a Point>,
        points: &[Point],
    ) -> Result<&'a Point, PlanError> {
        let origin = depot.ok_or(PlanError::NoDepot)?;
        if points.is_empty() {
            return Err(PlanError::InsufficientPoints {
                found: points.len() + 1,
            });
        }
        // Every drop point adds a leg, plus the return to the depot.
        if let Some(max) = self.config.max_stops
            && points.len() + 1 > max
        {
            return Err(PlanError::TooManyStops {
                stops: points.len(),
                max,
            });
        }
        Ok(origin)
    }

    fn solve_points(
        &self,
        key: &RouteKey,
        points: Vec<Point>,
    ) -> Result<(DistanceMatrix, Route), PlanError> {
        let matrix = DistanceMatrix::build(&points);
        let tour = self
            .solver
            .solve(&matrix, DEPOT, self.config.time_budget)
            .and_then(|tour| Tour::from_order(&matrix, DEPOT, tour.visit_order))
            .inspect_err(|err| log::error!("solver failed for {key}: {err}"))?;
        let route = Route::from_tour(points, &matrix, tour, self.config.average_speed_kmh);
        log::info!(
            "solved {key}: {:.3} km, {:.1} min, {} stops",
            route.total_distance_km,
            route.total_minutes(),
            route.points.len().saturating_sub(1)
        );
        Ok((matrix, route))
    }

    fn store(&mut self, key: RouteKey, route: Route) -> &Route {
        match self.routes.entry(key) {
            Entry::Occupied(mut slot) => {
                slot.insert(route);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(route),
        }
    }
}
