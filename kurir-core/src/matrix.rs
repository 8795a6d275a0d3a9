//! Pairwise geodesic distances between ordered points.
//!
//! [`DistanceMatrix::build`] is the only place coordinates are turned into
//! costs. The matrix is built fresh for every solve and is immutable once
//! constructed, so a route computed from it cannot be corrupted by later
//! changes to the caller's point list.

use geo::{Coord, Distance, Geodesic};
use thiserror::Error;

use crate::Point;

/// Errors returned by [`DistanceMatrix::from_rows`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// A row length differed from the number of rows.
    #[error("row {row} has {len} entries but the matrix has {expected} rows")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Entries found in that row.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },
    /// An entry was negative, NaN or infinite.
    #[error("entry ({row}, {col}) must be finite and non-negative, found {value}")]
    InvalidEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending value.
        value: f64,
    },
    /// A diagonal entry was not zero.
    #[error("diagonal entry {index} must be zero, found {value}")]
    NonZeroDiagonal {
        /// Diagonal index.
        index: usize,
        /// Offending value.
        value: f64,
    },
}

/// Geodesic distance in kilometres between two WGS84 coordinates.
///
/// Uses Karney's ellipsoidal algorithm on WGS84.
///
/// # Examples
/// ```
/// use kurir_core::{geodesic_km, lat_lon};
///
/// let km = geodesic_km(lat_lon(-6.70, 108.55), lat_lon(-6.71, 108.56));
/// assert!((km - 1.56).abs() < 0.01);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "metre to kilometre conversion is a floating-point division"
)]
pub fn geodesic_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Geodesic.distance(geo::Point::from(from), geo::Point::from(to)) / 1000.0
}

/// Square, symmetric matrix of geodesic distances in kilometres.
///
/// `get(i, j)` is the distance between the `i`th and `j`th point of the list
/// the matrix was built from. The diagonal is zero.
///
/// # Examples
/// ```
/// use kurir_core::{DistanceMatrix, Point, lat_lon};
///
/// let points = vec![
///     Point::new("depot", lat_lon(-6.70, 108.55)),
///     Point::new("drop", lat_lon(-6.71, 108.56)),
/// ];
/// let matrix = DistanceMatrix::build(&points);
/// assert_eq!(matrix.len(), 2);
/// assert_eq!(matrix.get(0, 0), Some(0.0));
/// assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Build the matrix for `points` in the given order.
    ///
    /// Each unordered pair is computed once and mirrored, which keeps the
    /// matrix exactly symmetric.
    #[must_use]
    pub fn build(points: &[Point]) -> Self {
        let n = points.len();
        let mut rows = vec![vec![0.0; n]; n];
        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate().skip(i + 1) {
                let km = geodesic_km(from.location, to.location);
                if let Some(cell) = rows.get_mut(i).and_then(|row| row.get_mut(j)) {
                    *cell = km;
                }
                if let Some(cell) = rows.get_mut(j).and_then(|row| row.get_mut(i)) {
                    *cell = km;
                }
            }
        }
        log::debug!("built {n}x{n} distance matrix");
        Self { rows }
    }

    /// Wrap caller-supplied distances in kilometres.
    ///
    /// The rows need not be symmetric, but must be square, finite,
    /// non-negative and zero on the diagonal.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError`] describing the first violation found.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let expected = rows.len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(MatrixError::NotSquare {
                    row,
                    len: values.len(),
                    expected,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(MatrixError::InvalidEntry { row, col, value });
                }
                if row == col && value != 0.0 {
                    return Err(MatrixError::NonZeroDiagonal { index: row, value });
                }
            }
        }
        Ok(Self { rows })
    }

    /// Number of points covered by the matrix.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` when the matrix covers no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distance in kilometres from point `from` to point `to`.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        self.rows.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Borrow the rows of the matrix.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Sum of the legs along `order`, in kilometres.
    ///
    /// Returns `None` if any index is out of range.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "tour length is a sum of floating-point legs"
    )]
    pub fn path_km(&self, order: &[usize]) -> Option<f64> {
        order
            .windows(2)
            .map(|pair| match pair {
                [from, to] => self.get(*from, *to),
                _ => None,
            })
            .try_fold(0.0, |total, leg| leg.map(|km| total + km))
    }

    /// Integer view of the matrix in whole metres, rounded to nearest.
    ///
    /// Solvers search over these values so that accept/reject decisions are
    /// free of floating-point drift.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "entries are validated finite and non-negative before rounding"
    )]
    pub fn to_meters(&self) -> Vec<Vec<u64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|km| (km * 1000.0).round() as u64).collect())
            .collect()
    }
}
