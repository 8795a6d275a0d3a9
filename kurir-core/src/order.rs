//! Delivery orders and their identifiers.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Point;

/// Opaque, unique order identifier.
///
/// # Examples
/// ```
/// use kurir_core::OrderId;
///
/// let id = OrderId::new("order-1");
/// assert_eq!(id.as_str(), "order-1");
/// assert_ne!(OrderId::generate(), OrderId::generate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random (UUID v4) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors returned by [`Order::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OrderError {
    /// The price was negative, NaN or infinite.
    #[error("order price must be a finite, non-negative amount, found {0}")]
    InvalidPrice(f64),
}

/// A customer order picked up by a courier and delivered to a destination.
///
/// When the customer and destination share a name the order is single-stop:
/// the courier drives from the depot to that point and back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    /// Unique identifier.
    pub id: OrderId,
    /// Courier assigned to the order.
    pub courier: String,
    /// Where the order is collected or who placed it.
    pub customer: Point,
    /// Where the order is delivered.
    pub destination: Point,
    /// Free-form description of the goods.
    pub item: String,
    /// Order value in the local currency.
    pub price: f64,
}

/// Fields of an [`Order`] before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Existing identifier, or `None` to generate one.
    pub id: Option<OrderId>,
    /// Courier assigned to the order.
    pub courier: String,
    /// Customer point.
    pub customer: Point,
    /// Destination point.
    pub destination: Point,
    /// Goods description.
    pub item: String,
    /// Order value.
    pub price: f64,
}

impl Order {
    /// Validate a draft and construct an [`Order`].
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidPrice`] for negative or non-finite
    /// prices.
    ///
    /// # Examples
    /// ```
    /// use kurir_core::{Order, OrderDraft, OrderId, Point, lat_lon};
    ///
    /// let home = Point::new("Bu Siti", lat_lon(-6.71, 108.56));
    /// let order = Order::new(OrderDraft {
    ///     id: Some(OrderId::new("a")),
    ///     courier: "Dedi".into(),
    ///     customer: home.clone(),
    ///     destination: home,
    ///     item: "Nasi jamblang".into(),
    ///     price: 25_000.0,
    /// })?;
    /// assert!(order.is_single_stop());
    /// # Ok::<(), kurir_core::OrderError>(())
    /// ```
    pub fn new(draft: OrderDraft) -> Result<Self, OrderError> {
        let OrderDraft {
            id,
            courier,
            customer,
            destination,
            item,
            price,
        } = draft;
        if !price.is_finite() || price < 0.0 {
            return Err(OrderError::InvalidPrice(price));
        }
        Ok(Self {
            id: id.unwrap_or_else(OrderId::generate),
            courier,
            customer,
            destination,
            item,
            price,
        })
    }

    /// Return `true` when customer and destination are the same named point.
    #[must_use]
    pub fn is_single_stop(&self) -> bool {
        self.customer.name == self.destination.name
    }

    /// Points the courier visits after leaving the depot, in booking order.
    #[must_use]
    pub fn stops(&self) -> Vec<Point> {
        if self.is_single_stop() {
            vec![self.destination.clone()]
        } else {
            vec![self.customer.clone(), self.destination.clone()]
        }
    }
}
