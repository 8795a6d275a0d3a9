//! Core domain types and algorithms for the kurir route engine.
//!
//! The crate turns validated geographic points into a geodesic cost matrix,
//! computes a minimum spanning tree overlay, and aggregates closed delivery
//! tours found by a pluggable [`TourSolver`]. Address lookup, rendering and
//! export stay outside; they meet the engine at [`Geocoder`],
//! [`RoutePlanner::routes`] and [`summarize`].
//!
//! # Examples
//! ```
//! use kurir_core::{DistanceMatrix, Point, Region, kruskal_mst, lat_lon};
//!
//! let region = Region::default();
//! let points = vec![
//!     Point::new("Gudang", lat_lon(-6.70, 108.55)),
//!     Point::new("Rumah A", lat_lon(-6.71, 108.56)),
//!     Point::new("Toko B", lat_lon(-6.72, 108.54)),
//! ];
//! assert!(points.iter().all(|p| region.contains(p.location)));
//!
//! let matrix = DistanceMatrix::build(&points);
//! let tree = kruskal_mst(&matrix);
//! assert_eq!(tree.edges.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod book;
mod geocode;
mod matrix;
mod mst;
mod order;
mod planner;
mod point;
mod region;
mod route;
mod summary;
mod tour;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use book::{BookError, DEFAULT_LOCALITY, OrderBook, Upsert};
pub use geocode::{CachingGeocoder, GeocodeError, Geocoder};
pub use matrix::{DistanceMatrix, MatrixError, geodesic_km};
pub use mst::{MstEdge, SpanningTree, kruskal_mst};
pub use order::{Order, OrderDraft, OrderError, OrderId};
pub use planner::{PlanError, PlannerConfig, RoutePlanner};
pub use point::Point;
pub use region::{Region, RegionError, lat_lon};
pub use route::{Route, RouteKey, Segment};
pub use summary::{MULTI_DROP_ROW_ID, SummaryRow, summarize};
pub use tour::{SolveError, Tour, TourSolver, is_closed_permutation};
