//! Deterministic doubles used by unit, behaviour and property tests.
//!
//! None of these touch the network, so planners built on them are
//! reproducible.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::{Destination, DistanceError, DistanceProvider, Point, haversine_miles};

/// Construct a destination labelled `Store {id}` at the given coordinates.
///
/// # Examples
/// ```rust
/// use shopwalk_core::test_support::destination;
///
/// let stop = destination(3, 0.0, 0.01);
/// assert_eq!(stop.id, 3);
/// assert_eq!(stop.store, "Store 3");
/// ```
#[must_use]
pub fn destination(id: u64, latitude: f64, longitude: f64) -> Destination {
    Destination::new(id, Point::new(latitude, longitude), format!("Store {id}"))
}

/// [`DistanceProvider`] answering every query with the same outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedDistanceProvider {
    response: Result<f64, DistanceError>,
}

impl FixedDistanceProvider {
    /// Every pair of points is `miles` apart.
    #[must_use]
    pub const fn miles(miles: f64) -> Self {
        Self { response: Ok(miles) }
    }

    /// Every lookup fails with `error`.
    #[must_use]
    pub const fn failing(error: DistanceError) -> Self {
        Self {
            response: Err(error),
        }
    }

    /// Every lookup fails as if the routing service were offline.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::failing(DistanceError::NetworkError {
            url: "http://127.0.0.1:9/route/v1/driving".to_owned(),
            message: "connection refused".to_owned(),
        })
    }
}

impl DistanceProvider for FixedDistanceProvider {
    fn distance(&self, _from: Point, _to: Point) -> Result<f64, DistanceError> {
        self.response.clone()
    }
}

/// Haversine [`DistanceProvider`] that counts how often it is queried.
#[derive(Debug, Default)]
pub struct CountingDistanceProvider {
    calls: AtomicUsize,
}

impl CountingDistanceProvider {
    /// Number of `distance` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl DistanceProvider for CountingDistanceProvider {
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(haversine_miles(from, to))
    }
}

/// Haversine [`DistanceProvider`] that sleeps before every answer, standing in
/// for a routing service close to its timeout.
#[derive(Debug, Default)]
pub struct SlowDistanceProvider {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowDistanceProvider {
    /// Answer each query after `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `distance` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl DistanceProvider for SlowDistanceProvider {
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        std::thread::sleep(self.delay);
        Ok(haversine_miles(from, to))
    }
}
