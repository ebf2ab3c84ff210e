//! Routes through destinations.
//!
//! Aggregates ordered destinations with the total distance travelled.

use crate::Destination;

/// An ordered visit of destinations with its total travel distance.
///
/// The distance covers the legs from the start through every destination;
/// there is no return leg.
///
/// # Examples
/// ```
/// use shopwalk_core::{Destination, Point, Route};
///
/// let stop = Destination::new(1, Point::new(0.0, 0.01), "Corner Market");
/// let route = Route::new(vec![stop], 0.69);
///
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.ids(), vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Destinations in visit order.
    pub destinations: Vec<Destination>,
    /// Total travel distance in miles.
    pub total_miles: f64,
}

impl Route {
    /// Construct a route from ordered destinations and total distance.
    #[must_use]
    pub const fn new(destinations: Vec<Destination>, total_miles: f64) -> Self {
        Self {
            destinations,
            total_miles,
        }
    }

    /// Construct an empty route.
    ///
    /// # Examples
    /// ```
    /// use shopwalk_core::Route;
    ///
    /// let route = Route::empty();
    /// assert!(route.is_empty());
    /// assert_eq!(route.total_miles, 0.0);
    /// ```
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), 0.0)
    }

    /// Number of destinations visited.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Whether the route visits nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Destination identifiers in visit order.
    #[must_use]
    pub fn ids(&self) -> Vec<u64> {
        self.destinations.iter().map(|stop| stop.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn route_preserves_order() {
        let first = Destination::new(2, Point::new(0.0, 0.0), "A");
        let second = Destination::new(1, Point::new(1.0, 1.0), "B");
        let route = Route::new(vec![first, second], 12.0);
        assert_eq!(route.ids(), vec![2, 1]);
        assert_eq!(route.total_miles, 12.0);
    }

    #[test]
    fn empty_route_has_no_distance() {
        let route = Route::empty();
        assert!(route.is_empty());
        assert_eq!(route.len(), 0);
        assert_eq!(route.total_miles, 0.0);
    }
}
