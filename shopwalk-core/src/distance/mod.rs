//! Price travel between two points.
//!
//! The [`DistanceProvider`] trait abstracts the source of edge costs used by
//! planners. Exact providers (e.g. a road-routing service) may fail; the
//! analytic [`HaversineDistance`] never does and is the fallback planners
//! apply per edge when an exact lookup errors.

mod error;
mod haversine;
mod provider;

pub use error::DistanceError;
pub use haversine::{EARTH_RADIUS_MILES, HaversineDistance, haversine_miles};
pub use provider::DistanceProvider;
