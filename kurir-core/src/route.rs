//! Solved delivery routes and the keys they are stored under.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DistanceMatrix, OrderId, Point, SpanningTree, Tour};

/// Key of a stored route: one per order plus a single multi-drop slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteKey {
    /// Route serving a single order.
    Order(OrderId),
    /// Combined route over every open order.
    MultiDrop,
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order(id) => write!(f, "order {id}"),
            Self::MultiDrop => f.write_str("multi-drop"),
        }
    }
}

impl From<OrderId> for RouteKey {
    fn from(id: OrderId) -> Self {
        Self::Order(id)
    }
}

/// One leg of a route between consecutive stops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    /// Where the leg starts.
    pub from: Point,
    /// Where the leg ends.
    pub to: Point,
    /// Leg length in kilometres.
    pub distance_km: f64,
    /// Driving time in minutes at the planner's average speed.
    pub travel_minutes: f64,
}

/// A solved closed route from the depot and back.
///
/// `points` are copies of the values supplied at solve time with the depot at
/// index 0; `visit_order` indexes into them. Multi-drop routes also carry the
/// spanning tree computed on the same matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    /// Points used in the solve, depot first.
    pub points: Vec<Point>,
    /// Indices into `points`, starting and ending at the depot.
    pub visit_order: Vec<usize>,
    /// Total length in kilometres.
    pub total_distance_km: f64,
    /// Legs in visiting order.
    pub segments: Vec<Segment>,
    /// Spanning-tree overlay for multi-drop routes.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub mst: Option<SpanningTree>,
}

impl Route {
    /// Assemble a route from a solved tour.
    ///
    /// Legs are measured on `matrix`; travel time is `distance / speed * 60`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "travel time derives from distance and average speed"
    )]
    pub fn from_tour(
        points: Vec<Point>,
        matrix: &DistanceMatrix,
        tour: Tour,
        average_speed_kmh: f64,
    ) -> Self {
        let segments = tour
            .visit_order
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some((*from, *to)),
                _ => None,
            })
            .filter_map(|(from, to)| {
                let distance_km = matrix.get(from, to)?;
                Some(Segment {
                    from: points.get(from)?.clone(),
                    to: points.get(to)?.clone(),
                    distance_km,
                    travel_minutes: distance_km / average_speed_kmh * 60.0,
                })
            })
            .collect();
        Self {
            points,
            visit_order: tour.visit_order,
            total_distance_km: tour.total_distance_km,
            segments,
            mst: None,
        }
    }

    /// Attach a spanning-tree overlay.
    #[must_use]
    pub fn with_mst(mut self, mst: SpanningTree) -> Self {
        self.mst = Some(mst);
        self
    }

    /// Total driving time in minutes.
    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        self.segments.iter().map(|segment| segment.travel_minutes).sum()
    }

    /// Names along the route joined with arrows, e.g. `Depot -> A -> Depot`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.visit_order
            .iter()
            .filter_map(|&index| self.points.get(index))
            .map(|point| point.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
