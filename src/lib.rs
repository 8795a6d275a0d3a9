//! Facade crate for the Kurir delivery route engine.
//!
//! This crate re-exports the core domain types and exposes the tour solver
//! implementations behind feature flags.

#![forbid(unsafe_code)]

pub use kurir_core::{
    BookError, CachingGeocoder, DistanceMatrix, GeocodeError, Geocoder, MatrixError, MstEdge,
    Order, OrderBook, OrderDraft, OrderError, OrderId, PlanError, PlannerConfig, Point, Region,
    RegionError, Route, RouteKey, RoutePlanner, Segment, SolveError, SpanningTree, SummaryRow,
    Tour, TourSolver, Upsert, geodesic_km, kruskal_mst, lat_lon, summarize,
};

#[cfg(feature = "solver-ls")]
pub use kurir_solver_ls::{LocalSearchConfig, LocalSearchSolver};

#[cfg(feature = "solver-vrp")]
pub use kurir_solver_vrp::{VrpTourSolver, VrpTourSolverConfig};
