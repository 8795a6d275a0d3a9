//! Test helpers for writing delivery plans into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use kurir_core::TourSolver;
use kurir_core::test_support::{BruteForceSolver, FailingSolver};
use tempfile::TempDir;

use crate::plan::{OrderPayload, PlacePayload, PlanConfig, PlanFile, TourSolverBuilder};
use super::*;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write file");
}

/// Temporary directory with a UTF-8 root path.
pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

pub(super) fn place(name: &str, lat: f64, lon: f64) -> PlacePayload {
    PlacePayload {
        name: name.to_owned(),
        lat,
        lon,
    }
}

/// Depot plus two orders in Cirebon: one single-stop, one two-stop.
pub(super) fn sample_plan() -> PlanFile {
    PlanFile {
        depot: place("Gudang", -6.70, 108.55),
        orders: vec![
            OrderPayload {
                id: Some("order-a".to_owned()),
                courier: "Dedi".to_owned(),
                customer: place("Rumah A", -6.71, 108.56),
                destination: place("Rumah A", -6.71, 108.56),
                item: "Empal gentong".to_owned(),
                price: 30_000.0,
            },
            OrderPayload {
                id: Some("order-b".to_owned()),
                courier: "Asep".to_owned(),
                customer: place("Toko B", -6.72, 108.54),
                destination: place("Tujuan B", -6.73, 108.53),
                item: "Batik trusmi".to_owned(),
                price: 150_000.0,
            },
        ],
    }
}

pub(super) fn write_plan(path: &Utf8Path, plan: &PlanFile) {
    let payload = serde_json::to_string_pretty(plan).expect("serialise plan");
    write_utf8(path, payload.as_bytes());
}

/// Hands out the exhaustive solver so reports are exact.
pub(super) struct BruteForceBuilder;

impl TourSolverBuilder for BruteForceBuilder {
    fn build(&self, _config: &PlanConfig) -> Result<Box<dyn TourSolver>, CliError> {
        Ok(Box::new(BruteForceSolver))
    }
}

/// Hands out a solver that never finds a tour.
pub(super) struct FailingBuilder;

impl TourSolverBuilder for FailingBuilder {
    fn build(&self, _config: &PlanConfig) -> Result<Box<dyn TourSolver>, CliError> {
        Ok(Box::new(FailingSolver))
    }
}
