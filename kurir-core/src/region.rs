//! Service-area validation for coordinates.
//!
//! A [`Region`] is an axis-aligned latitude/longitude rectangle. Every
//! coordinate must pass [`Region::contains`] before it reaches the distance
//! matrix builder.

use geo::{Coord, Intersects, Rect};
use thiserror::Error;

/// Build a coordinate from latitude and longitude in degrees.
///
/// Coordinates follow the `geo` convention of `x = longitude` and
/// `y = latitude`; this helper keeps call sites readable.
///
/// # Examples
/// ```
/// use kurir_core::lat_lon;
///
/// let coord = lat_lon(-6.70, 108.55);
/// assert_eq!(coord.y, -6.70);
/// assert_eq!(coord.x, 108.55);
/// ```
#[must_use]
pub const fn lat_lon(lat: f64, lon: f64) -> Coord<f64> {
    Coord { x: lon, y: lat }
}

/// Errors returned by [`Region::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RegionError {
    /// A bound was NaN or infinite.
    #[error("region bounds must be finite")]
    NonFinite,
    /// A minimum bound exceeded its maximum.
    #[error("region {axis} minimum {min} exceeds maximum {max}")]
    Inverted {
        /// Axis name, `latitude` or `longitude`.
        axis: &'static str,
        /// Supplied minimum.
        min: f64,
        /// Supplied maximum.
        max: f64,
    },
}

/// Rectangular service area; bounds are inclusive.
///
/// # Examples
/// ```
/// use kurir_core::{Region, lat_lon};
///
/// let region = Region::default();
/// assert!(region.contains(lat_lon(-6.70, 108.55)));
/// assert!(!region.contains(lat_lon(-7.0, 108.55)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    bounds: Rect<f64>,
}

impl Region {
    /// Latitude range of the default Cirebon service area.
    pub const CIREBON_LAT: (f64, f64) = (-6.9, -6.5);
    /// Longitude range of the default Cirebon service area.
    pub const CIREBON_LON: (f64, f64) = (108.4, 108.7);

    /// Validate and construct a region from `(min, max)` ranges in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] when a bound is not finite or a range is
    /// inverted.
    pub fn new(lat: (f64, f64), lon: (f64, f64)) -> Result<Self, RegionError> {
        let (lat_min, lat_max) = lat;
        let (lon_min, lon_max) = lon;
        if ![lat_min, lat_max, lon_min, lon_max]
            .iter()
            .all(|bound| bound.is_finite())
        {
            return Err(RegionError::NonFinite);
        }
        if lat_min > lat_max {
            return Err(RegionError::Inverted {
                axis: "latitude",
                min: lat_min,
                max: lat_max,
            });
        }
        if lon_min > lon_max {
            return Err(RegionError::Inverted {
                axis: "longitude",
                min: lon_min,
                max: lon_max,
            });
        }
        Ok(Self {
            bounds: Rect::new(lat_lon(lat_min, lon_min), lat_lon(lat_max, lon_max)),
        })
    }

    /// Return `true` when `coord` lies inside the region, boundary included.
    ///
    /// Non-finite coordinates are never contained.
    #[must_use]
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        // `Intersects` treats boundary points as inside the rectangle.
        coord.x.is_finite() && coord.y.is_finite() && self.bounds.intersects(&coord)
    }

    /// South-west corner as a coordinate.
    #[must_use]
    pub fn min(&self) -> Coord<f64> {
        self.bounds.min()
    }

    /// North-east corner as a coordinate.
    #[must_use]
    pub fn max(&self) -> Coord<f64> {
        self.bounds.max()
    }
}

impl Default for Region {
    fn default() -> Self {
        let (lat_min, lat_max) = Self::CIREBON_LAT;
        let (lon_min, lon_max) = Self::CIREBON_LON;
        Self {
            bounds: Rect::new(lat_lon(lat_min, lon_min), lat_lon(lat_max, lon_max)),
        }
    }
}
