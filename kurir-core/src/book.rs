//! Depot, orders and the distinct drop points they introduce.
//!
//! The book is host-side state: it validates coordinates against a
//! [`Region`] on the way in, so everything it hands to the
//! [`crate::RoutePlanner`] is already inside the service area.

use std::borrow::Cow;

use geo::Coord;
use thiserror::Error;

use crate::{GeocodeError, Geocoder, Order, OrderId, Point, Region};

/// Errors returned by [`OrderBook`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookError {
    /// A point lies outside the service region.
    #[error("{name} at ({lat}, {lon}) is outside the service region", lat = .location.y, lon = .location.x)]
    OutOfRegion {
        /// Name of the rejected point.
        name: String,
        /// Its coordinate.
        location: Coord<f64>,
    },
    /// The address could not be resolved.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Outcome of [`OrderBook::upsert_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new order was appended.
    Created,
    /// An order with the same id was replaced in place.
    Updated,
}

/// Locality appended to every address handed to a [`Geocoder`].
pub const DEFAULT_LOCALITY: &str = "Cirebon, Indonesia";

/// Depot plus open orders, in booking order.
///
/// # Examples
/// ```
/// use kurir_core::{Order, OrderBook, OrderDraft, Point, Region, Upsert, lat_lon};
///
/// let mut book = OrderBook::new(Region::default());
/// book.set_depot(Point::new("Gudang", lat_lon(-6.70, 108.55)))?;
/// let home = Point::new("Bu Siti", lat_lon(-6.71, 108.56));
/// let order = Order::new(OrderDraft {
///     id: None,
///     courier: "Dedi".into(),
///     customer: home.clone(),
///     destination: home,
///     item: "Empal gentong".into(),
///     price: 30_000.0,
/// })?;
/// assert_eq!(book.upsert_order(order)?, Upsert::Created);
/// assert_eq!(book.distinct_points().len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct OrderBook {
    region: Region,
    locality: Cow<'static, str>,
    depot: Option<Point>,
    orders: Vec<Order>,
    points: Vec<Point>,
}

impl OrderBook {
    /// Create an empty book validating against `region`.
    #[must_use]
    pub const fn new(region: Region) -> Self {
        Self {
            region,
            locality: Cow::Borrowed(DEFAULT_LOCALITY),
            depot: None,
            orders: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Replace the locality appended to geocoded addresses; an empty
    /// locality sends addresses unchanged.
    #[must_use]
    pub fn with_locality(mut self, locality: impl Into<Cow<'static, str>>) -> Self {
        self.locality = locality.into();
        self
    }

    /// Service region used for validation.
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Current depot, if one has been set.
    #[must_use]
    pub const fn depot(&self) -> Option<&Point> {
        self.depot.as_ref()
    }

    /// Set or replace the depot.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::OutOfRegion`] when the depot lies outside the
    /// region; the previous depot is kept.
    pub fn set_depot(&mut self, depot: Point) -> Result<(), BookError> {
        self.check_region(&depot)?;
        log::info!("depot set to {}", depot.name);
        self.depot = Some(depot);
        Ok(())
    }

    /// Insert a new order or replace the one with the same id.
    ///
    /// Customer and destination are registered as drop points unless the
    /// depot or an earlier point already carries the same name.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::OutOfRegion`] if either point lies outside the
    /// region; the book is left unchanged.
    pub fn upsert_order(&mut self, order: Order) -> Result<Upsert, BookError> {
        self.check_region(&order.customer)?;
        self.check_region(&order.destination)?;
        self.register(&order.customer);
        self.register(&order.destination);

        if let Some(existing) = self.orders.iter_mut().find(|o| o.id == order.id) {
            log::info!("order {} updated", order.id);
            *existing = order;
            return Ok(Upsert::Updated);
        }
        log::info!("order {} created", order.id);
        self.orders.push(order);
        Ok(Upsert::Created)
    }

    /// Orders in booking order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order by id.
    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Drop points of every order, unique by name, in first-seen order.
    ///
    /// Points are never removed when an order is edited, so a renamed stop
    /// remains in the list.
    #[must_use]
    pub fn distinct_points(&self) -> &[Point] {
        &self.points
    }

    /// Resolve `address` and build a named, region-checked point.
    ///
    /// The geocoder receives `"{address}, {locality}"`, so results and any
    /// cache keys are scoped to the service area.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Geocode`] when the lookup fails and
    /// [`BookError::OutOfRegion`] when the result lies outside the region.
    pub fn locate<G: Geocoder + ?Sized>(
        &self,
        geocoder: &G,
        name: &str,
        address: &str,
    ) -> Result<Point, BookError> {
        let query = if self.locality.is_empty() {
            address.to_owned()
        } else {
            format!("{address}, {}", self.locality)
        };
        let location = geocoder.resolve(&query).inspect_err(|err| {
            log::warn!("could not locate {name}: {err}");
        })?;
        let point = Point::new(name, location);
        self.check_region(&point)?;
        Ok(point)
    }

    fn check_region(&self, point: &Point) -> Result<(), BookError> {
        if self.region.contains(point.location) {
            Ok(())
        } else {
            Err(BookError::OutOfRegion {
                name: point.name.clone(),
                location: point.location,
            })
        }
    }

    fn register(&mut self, point: &Point) {
        let is_depot = self.depot.as_ref().is_some_and(|d| d.name == point.name);
        if is_depot || self.points.iter().any(|p| p.name == point.name) {
            return;
        }
        self.points.push(point.clone());
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new(Region::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lat_lon;
    use crate::test_support::{MemoryGeocoder, cirebon_depot, single_stop_order, two_stop_order};
    use rstest::{fixture, rstest};

    #[fixture]
    fn book() -> OrderBook {
        let mut book = OrderBook::default();
        book.set_depot(cirebon_depot()).expect("depot inside region");
        book
    }

    #[rstest]
    fn depot_outside_region_is_rejected() {
        let mut book = OrderBook::default();
        let err = book
            .set_depot(Point::new("Kuningan", lat_lon(-7.0, 108.55)))
            .expect_err("outside region");
        assert!(matches!(err, BookError::OutOfRegion { ref name, .. } if name == "Kuningan"));
        assert!(book.depot().is_none());
    }

    #[rstest]
    fn points_are_deduplicated_by_name(mut book: OrderBook) {
        book.upsert_order(single_stop_order()).expect("order a");
        book.upsert_order(two_stop_order()).expect("order b");
        let mut again = two_stop_order();
        again.id = OrderId::new("order-c");
        book.upsert_order(again).expect("order c");

        let names: Vec<&str> = book
            .distinct_points()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Rumah A", "Toko B", "Tujuan B"]);
        assert_eq!(book.orders().len(), 3);
    }

    #[rstest]
    fn depot_name_is_not_registered_as_a_drop(mut book: OrderBook) {
        let mut order = single_stop_order();
        order.destination = cirebon_depot();
        order.customer = cirebon_depot();
        book.upsert_order(order).expect("order at depot");
        assert!(book.distinct_points().is_empty());
    }

    #[rstest]
    fn same_id_updates_in_place(mut book: OrderBook) {
        book.upsert_order(single_stop_order()).expect("create");
        book.upsert_order(two_stop_order()).expect("create");
        let mut edited = single_stop_order();
        edited.price = 99_000.0;
        assert_eq!(book.upsert_order(edited), Ok(Upsert::Updated));
        let first = book.orders().first().expect("first order");
        assert_eq!(first.price, 99_000.0);
        assert_eq!(book.orders().len(), 2);
        assert!(book.order(&OrderId::new("order-b")).is_some());
    }

    #[rstest]
    fn out_of_region_order_leaves_book_unchanged(mut book: OrderBook) {
        let mut order = two_stop_order();
        order.destination.location = lat_lon(-6.7, 109.0);
        assert!(matches!(
            book.upsert_order(order),
            Err(BookError::OutOfRegion { .. })
        ));
        assert!(book.orders().is_empty());
        assert!(book.distinct_points().is_empty());
    }

    #[rstest]
    fn locate_resolves_and_validates(book: OrderBook) {
        let geocoder = MemoryGeocoder::default()
            .with_address("Jl. Kartini, Cirebon, Indonesia", lat_lon(-6.71, 108.56))
            .with_address("Jl. Jakarta, Cirebon, Indonesia", lat_lon(-6.2, 106.8));
        let point = book
            .locate(&geocoder, "Bu Siti", "Jl. Kartini")
            .expect("inside region");
        assert_eq!(point.name, "Bu Siti");
        assert!(matches!(
            book.locate(&geocoder, "Pak Budi", "Jl. Jakarta"),
            Err(BookError::OutOfRegion { .. })
        ));
        assert!(matches!(
            book.locate(&geocoder, "Pak Budi", "Unknown"),
            Err(BookError::Geocode(GeocodeError::NotFound(_)))
        ));
    }

    #[rstest]
    fn locate_appends_the_configured_locality() {
        let geocoder = MemoryGeocoder::default()
            .with_address("Jl. Kartini", lat_lon(-6.71, 108.56))
            .with_address("Jl. Kartini, Kota Cirebon", lat_lon(-6.72, 108.57));
        let raw = OrderBook::default().with_locality("");
        assert_eq!(
            raw.locate(&geocoder, "Bu Siti", "Jl. Kartini")
                .expect("raw address")
                .location,
            lat_lon(-6.71, 108.56)
        );
        let city = OrderBook::default().with_locality("Kota Cirebon");
        assert_eq!(
            city.locate(&geocoder, "Bu Siti", "Jl. Kartini")
                .expect("qualified address")
                .location,
            lat_lon(-6.72, 108.57)
        );
        assert!(matches!(
            OrderBook::default().locate(&geocoder, "Bu Siti", "Jl. Kartini"),
            Err(BookError::Geocode(GeocodeError::NotFound(query)))
                if query == "Jl. Kartini, Cirebon, Indonesia"
        ));
    }
}
