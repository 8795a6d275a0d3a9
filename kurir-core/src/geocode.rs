//! Boundary to the address lookup collaborator.
//!
//! The engine never resolves addresses itself. Hosts implement [`Geocoder`]
//! over whatever provider they use and resolve points through
//! [`crate::OrderBook::locate`] before anything is solved.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use geo::Coord;
use thiserror::Error;

/// Errors returned by a [`Geocoder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The provider had no match for the address.
    #[error("address not found: {0}")]
    NotFound(String),
    /// The provider could not be reached or failed temporarily.
    #[error("geocoding failed: {0}")]
    Transient(String),
}

/// Resolves free-form addresses to coordinates.
pub trait Geocoder: Send + Sync {
    /// Resolve `address` to a `(lon, lat)` coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NotFound`] when nothing matches and
    /// [`GeocodeError::Transient`] for provider failures.
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        (**self).resolve(address)
    }
}

/// Memoises successful lookups of an inner [`Geocoder`].
///
/// Failures are never cached, so a transient outage is retried on the next
/// call. The cache lives in memory; hosts that keep it across runs seed it
/// with [`CachingGeocoder::with_entries`] and save [`CachingGeocoder::entries`]
/// (both serialise with `serde` when the feature is on).
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kurir_core::{CachingGeocoder, GeocodeError, Geocoder, lat_lon};
///
/// struct Fixed;
///
/// impl Geocoder for Fixed {
///     fn resolve(&self, _address: &str) -> Result<Coord<f64>, GeocodeError> {
///         Ok(lat_lon(-6.70, 108.55))
///     }
/// }
///
/// let geocoder = CachingGeocoder::new(Fixed);
/// assert_eq!(geocoder.resolve("Jl. Siliwangi")?, lat_lon(-6.70, 108.55));
/// assert_eq!(geocoder.cached(), 1);
/// # Ok::<(), GeocodeError>(())
/// ```
#[derive(Debug)]
pub struct CachingGeocoder<G> {
    inner: G,
    cache: Mutex<HashMap<String, Coord<f64>>>,
}

impl<G: Geocoder> CachingGeocoder<G> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Wrap `inner` with a cache seeded from a previous run.
    #[must_use]
    pub fn with_entries(inner: G, entries: impl IntoIterator<Item = (String, Coord<f64>)>) -> Self {
        Self {
            inner,
            cache: Mutex::new(entries.into_iter().collect()),
        }
    }

    /// Snapshot of the cache, sorted by address.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, Coord<f64>> {
        self.cache.lock().map_or_else(
            |_| BTreeMap::new(),
            |cache| {
                cache
                    .iter()
                    .map(|(address, coord)| (address.clone(), *coord))
                    .collect()
            },
        )
    }

    /// Number of cached addresses.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }
}

impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        if let Some(hit) = self
            .cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(address).copied())
        {
            log::debug!("geocode cache hit for {address}");
            return Ok(hit);
        }
        let coord = self.inner.resolve(address)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(address.to_owned(), coord);
        }
        Ok(coord)
    }
}
