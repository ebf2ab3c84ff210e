//! Great-circle distance on a spherical Earth.

use crate::Point;

use super::error::DistanceError;
use super::provider::DistanceProvider;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance between two points in miles.
///
/// # Examples
/// ```
/// use shopwalk_core::{Point, haversine_miles};
///
/// let a = Point::new(0.0, 0.0);
/// assert_eq!(haversine_miles(a, a), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point trigonometry"
)]
pub fn haversine_miles(from: Point, to: Point) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (to.longitude - from.longitude).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    // Rounding can push `a` fractionally past one for antipodal points.
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// [`DistanceProvider`] returning the haversine distance. Never fails.
#[derive(Default, Debug, Copy, Clone)]
pub struct HaversineDistance;

impl DistanceProvider for HaversineDistance {
    fn distance(&self, from: Point, to: Point) -> Result<f64, DistanceError> {
        Ok(haversine_miles(from, to))
    }
}
