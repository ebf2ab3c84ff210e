//! Turn a shopping request into a plan request.
//!
//! Shoppers select products; each product names the store it comes from and,
//! when known, the store's location. Products sharing a location collapse
//! into a single [`Destination`] carrying every item to collect there.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Destination, LocationKey, PlanRequest, PlanRequestValidationError, Point};

/// Where a product's store is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductLocation {
    /// Store coordinates.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub point: Point,
    /// Street address, when the retailer supplied one.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub address: Option<String>,
}

/// A product selected by the shopper.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Product {
    /// Product name.
    pub name: String,
    /// Store selling the product.
    pub store: String,
    /// Store location; products without one cannot be routed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<ProductLocation>,
}

/// Payload submitted by a shopper asking for a route.
///
/// # Examples
/// ```
/// use shopwalk_core::{Point, Product, ProductLocation, ShoppingRequest};
///
/// let request = ShoppingRequest {
///     products: vec![Product {
///         name: "Milk".into(),
///         store: "Corner Market".into(),
///         location: Some(ProductLocation { point: Point::new(0.0, 0.01), address: None }),
///     }],
///     user_location: Some(Point::new(0.0, 0.0)),
/// };
/// let plan = request.into_plan_request().expect("valid request");
/// assert_eq!(plan.destinations.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ShoppingRequest {
    /// Selected products.
    #[cfg_attr(feature = "serde", serde(default))]
    pub products: Vec<Product>,
    /// Where the shopper starts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub user_location: Option<Point>,
}

impl ShoppingRequest {
    /// Group the products into destinations and attach the start point.
    ///
    /// # Errors
    ///
    /// Returns [`PlanRequestValidationError::NoProducts`] for an empty product
    /// list, [`PlanRequestValidationError::MissingStart`] without a user
    /// location, and any error raised by [`PlanRequest::validate`].
    pub fn into_plan_request(self) -> Result<PlanRequest, PlanRequestValidationError> {
        if self.products.is_empty() {
            return Err(PlanRequestValidationError::NoProducts);
        }
        let start = self
            .user_location
            .ok_or(PlanRequestValidationError::MissingStart)?;
        let request = PlanRequest::new(start, group_products(&self.products));
        request.validate()?;
        Ok(request)
    }
}

/// Collapse products into one destination per distinct location.
///
/// Destinations appear in first-seen order and are numbered from zero. The
/// first product at a location names the store; its address (or, failing
/// that, the store label) becomes the display address. Products without a
/// location are skipped.
#[must_use]
pub fn group_products(products: &[Product]) -> Vec<Destination> {
    let mut slots: HashMap<LocationKey, usize> = HashMap::new();
    let mut destinations: Vec<Destination> = Vec::new();

    for product in products {
        let Some(location) = &product.location else {
            continue;
        };
        let key = location.point.key();
        let slot = *slots.entry(key).or_insert_with(|| {
            let id = u64::try_from(destinations.len()).unwrap_or(u64::MAX);
            let address = location
                .address
                .clone()
                .unwrap_or_else(|| product.store.clone());
            destinations
                .push(Destination::new(id, location.point, &product.store).with_address(address));
            destinations.len() - 1
        });
        if let Some(destination) = destinations.get_mut(slot) {
            destination.items.push(product.name.clone());
        }
    }

    destinations
}
