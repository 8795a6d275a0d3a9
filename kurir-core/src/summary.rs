//! Tabular summary of solved routes for export.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{OrderBook, Route, RouteKey, RoutePlanner, TourSolver};

/// Identifier used for the multi-drop summary row.
pub const MULTI_DROP_ROW_ID: &str = "multi-drop";

/// One exported line: an order or the combined multi-drop tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryRow {
    /// Order id, or [`MULTI_DROP_ROW_ID`].
    pub id: String,
    /// Courier name.
    pub courier: String,
    /// Customer name.
    pub customer: String,
    /// Destination name.
    pub destination: String,
    /// Goods, joined with `; ` on the multi-drop row.
    pub item: String,
    /// Order value, summed on the multi-drop row.
    pub price: f64,
    /// Route length in kilometres.
    pub distance_km: f64,
    /// Driving time in minutes.
    pub minutes: f64,
    /// Stops in visiting order, e.g. `Depot -> A -> Depot`.
    pub route: String,
}

impl SummaryRow {
    fn with_route(route: &Route) -> Self {
        Self {
            id: String::new(),
            courier: String::new(),
            customer: String::new(),
            destination: String::new(),
            item: String::new(),
            price: 0.0,
            distance_km: route.total_distance_km,
            minutes: route.total_minutes(),
            route: route.describe(),
        }
    }
}

/// Build summary rows from the book and the planner's stored routes.
///
/// The multi-drop row comes first when a multi-drop route is stored. It uses
/// the first order's courier (or `N/A`), `all` as customer and destination,
/// every item joined with `; ` and the summed price. One row follows per
/// order with a stored route, in booking order; orders without a route are
/// skipped.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the multi-drop row sums order prices"
)]
pub fn summarize<S: TourSolver>(book: &OrderBook, planner: &RoutePlanner<S>) -> Vec<SummaryRow> {
    let orders = book.orders();
    let mut rows = Vec::with_capacity(orders.len() + 1);

    if let Some(route) = planner.route(&RouteKey::MultiDrop) {
        rows.push(SummaryRow {
            id: MULTI_DROP_ROW_ID.to_owned(),
            courier: orders
                .first()
                .map_or_else(|| "N/A".to_owned(), |order| order.courier.clone()),
            customer: "all".to_owned(),
            destination: "all".to_owned(),
            item: orders
                .iter()
                .map(|order| order.item.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            price: orders.iter().map(|order| order.price).sum(),
            ..SummaryRow::with_route(route)
        });
    }

    rows.extend(orders.iter().filter_map(|order| {
        let route = planner.route(&RouteKey::Order(order.id.clone()))?;
        Some(SummaryRow {
            id: order.id.to_string(),
            courier: order.courier.clone(),
            customer: order.customer.name.clone(),
            destination: order.destination.name.clone(),
            item: order.item.clone(),
            price: order.price,
            ..SummaryRow::with_route(route)
        })
    }));
    rows
}
