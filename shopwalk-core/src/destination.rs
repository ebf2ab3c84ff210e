//! Stores to visit and the items collected at each.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{LocationKey, Point};

/// A physical location on the shopping trip.
///
/// Serialises with the location flattened, giving
/// `{"id", "lat", "lng", "name", "address", "products"}`.
///
/// # Examples
/// ```
/// use shopwalk_core::{Destination, Point};
///
/// let stop = Destination::new(1, Point::new(40.0, -74.0), "Corner Market")
///     .with_item("Milk")
///     .with_item("Bread");
/// assert_eq!(stop.address, "Corner Market");
/// assert_eq!(stop.items, vec!["Milk".to_owned(), "Bread".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Destination {
    /// Caller-assigned identifier, opaque to planners.
    pub id: u64,
    /// Where the store is.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub location: Point,
    /// Store label shown to the shopper.
    #[cfg_attr(feature = "serde", serde(rename = "name"))]
    pub store: String,
    /// Display address; defaults to the store label.
    pub address: String,
    /// Names of the items collected here.
    #[cfg_attr(feature = "serde", serde(rename = "products", default))]
    pub items: Vec<String>,
}

impl Destination {
    /// Construct a destination with no items, addressed by its store label.
    pub fn new(id: u64, location: Point, store: impl Into<String>) -> Self {
        let store = store.into();
        Self {
            id,
            location,
            address: store.clone(),
            store,
            items: Vec::new(),
        }
    }

    /// Replace the display address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Append an item to collect.
    #[must_use]
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Location identity used for deduplication.
    #[must_use]
    pub fn key(&self) -> LocationKey {
        self.location.key()
    }
}
