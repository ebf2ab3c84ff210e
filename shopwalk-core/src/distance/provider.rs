//! Distance provider trait and forwarding impls.

use std::sync::Arc;

use crate::Point;

use super::error::DistanceError;

/// Price the travel between two points, in miles.
///
/// Implementations return a nonnegative, finite distance or a
/// [`DistanceError`] describing why an exact figure is unavailable. Planners
/// recover from errors by substituting the haversine distance, so providers
/// should fail fast rather than retry.
///
/// # Examples
///
/// ```rust
/// use shopwalk_core::{DistanceError, DistanceProvider, Point};
///
/// struct Manhattan;
///
/// impl DistanceProvider for Manhattan {
///     fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
///         Ok((from.latitude - to.latitude).abs() + (from.longitude - to.longitude).abs())
///     }
/// }
///
/// let miles = Manhattan.distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0))?;
/// assert_eq!(miles, 7.0);
/// # Ok::<(), DistanceError>(())
/// ```
pub trait DistanceProvider {
    /// Return the travel cost from `from` to `to` in miles.
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError>;
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for &T {
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
        (**self).distance(from, to)
    }
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for Box<T> {
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
        (**self).distance(from, to)
    }
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for Arc<T> {
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
        (**self).distance(from, to)
    }
}
