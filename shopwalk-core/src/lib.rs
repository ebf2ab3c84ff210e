//! Core domain types for the Shopwalk route planner.
//!
//! The crate defines the values that flow through a planning call
//! ([`Point`], [`Destination`], [`Route`]), the [`DistanceProvider`] seam used
//! to price travel between two points, and the [`Planner`] trait implemented
//! by solver crates. Request validation lives here so every planner rejects
//! malformed input the same way.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod destination;
pub mod distance;
pub mod intake;
pub mod planner;
pub mod point;
pub mod route;
#[doc(hidden)]
pub mod test_support;

pub use destination::Destination;
pub use distance::{
    DistanceError, DistanceProvider, EARTH_RADIUS_MILES, HaversineDistance, haversine_miles,
};
pub use intake::{Product, ProductLocation, ShoppingRequest, group_products};
pub use planner::{
    PlanDiagnostics, PlanError, PlanRequest, PlanRequestValidationError, PlanResponse,
    PlanStrategy, Planner,
};
pub use point::{LocationKey, Point};
pub use route::Route;
