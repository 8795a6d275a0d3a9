//! `vrp-core` backed fixed-depot tour solver for Kurir.
//!
//! This crate provides [`VrpTourSolver`], an implementation of the
//! [`TourSolver`](kurir_core::TourSolver) trait that models a delivery tour
//! as a single-vehicle VRP: every non-depot point becomes a mandatory job and
//! the vehicle starts and ends at the depot. The `vrp-core` metaheuristics
//! minimise total distance within a generation limit and the caller's time
//! budget.
//!
//! Budgets are passed to `vrp-core` in whole seconds, so sub-second budgets
//! are rounded up to one second. A zero budget is rejected up front.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod vrp;

pub use solver::{VrpTourSolver, VrpTourSolverConfig};
