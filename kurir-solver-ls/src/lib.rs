//! Native fixed-depot tour solver for Kurir.
//!
//! This crate provides [`LocalSearchSolver`], an implementation of the
//! [`TourSolver`](kurir_core::TourSolver) trait with no third-party optimiser.
//! It builds a path-cheapest-arc tour, then improves it with 2-opt and or-opt
//! moves under guided local search until the search converges or the time
//! budget runs out.
//!
//! The search itself is exposed as [`LocalSearch`], a state machine stepped
//! one unit of work at a time against a [`Clock`]. Tests drive it with
//! [`TickClock`] for deterministic budget expiry.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod clock;
mod construct;
mod cost;
mod moves;
mod search;
mod solver;

pub use clock::{Clock, SystemClock, TickClock};
pub use search::{LocalSearch, SearchOutcome, SearchState};
pub use solver::{LocalSearchConfig, LocalSearchSolver};
