use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named location a courier starts from or delivers to.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Names
/// identify points within one solve, so callers keep them unique.
///
/// # Examples
/// ```
/// use kurir_core::{Point, lat_lon};
///
/// let depot = Point::new("Dapur Pusat", lat_lon(-6.70, 108.55));
/// assert_eq!(depot.name, "Dapur Pusat");
/// assert_eq!(depot.lat(), -6.70);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Display name, unique within a solve.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
}

impl Point {
    /// Construct a point from a name and location.
    pub fn new(name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }
}
