//! Geographic points and their hashable identity.

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distance::haversine_miles;

/// A WGS84 position in decimal degrees.
///
/// Serialised as `{"lat": .., "lng": ..}` to match the shopping request
/// payload.
///
/// # Examples
/// ```
/// use shopwalk_core::Point;
///
/// let point = Point::new(40.7128, -74.0060);
/// assert!(point.is_valid());
/// assert_eq!(point.key(), Point::new(40.7128, -74.0060).key());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Latitude in degrees, positive north.
    #[cfg_attr(feature = "serde", serde(rename = "lat"))]
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    #[cfg_attr(feature = "serde", serde(rename = "lng"))]
    pub longitude: f64,
}

impl Point {
    /// Construct a point from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Identity used for deduplication and the search closed set.
    #[must_use]
    pub fn key(&self) -> LocationKey {
        LocationKey::from(*self)
    }

    /// Whether both coordinates are finite and inside their WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in miles.
    #[must_use]
    pub fn haversine_miles(&self, other: &Self) -> f64 {
        haversine_miles(*self, *other)
    }
}

impl From<Point> for Coord<f64> {
    fn from(point: Point) -> Self {
        Self {
            x: point.longitude,
            y: point.latitude,
        }
    }
}

impl From<Coord<f64>> for Point {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}

/// Exact-coordinate identity of a [`Point`].
///
/// Two points share a key when their coordinates are bitwise equal, with
/// `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationKey {
    latitude_bits: u64,
    longitude_bits: u64,
}

fn normalised_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl From<Point> for LocationKey {
    fn from(point: Point) -> Self {
        Self {
            latitude_bits: normalised_bits(point.latitude),
            longitude_bits: normalised_bits(point.longitude),
        }
    }
}
