//! Planning requests, responses and the [`Planner`] trait.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Destination, Point, Route};

/// Parameters for a planning call.
///
/// # Examples
/// ```rust
/// use shopwalk_core::{Destination, PlanRequest, Point};
///
/// let request = PlanRequest::new(
///     Point::new(0.0, 0.0),
///     vec![Destination::new(0, Point::new(0.0, 0.01), "Corner Market")],
/// );
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanRequest {
    /// Where the shopper starts.
    pub start: Point,
    /// Destinations to visit, deduplicated by location.
    pub destinations: Vec<Destination>,
}

/// Reasons a [`PlanRequest`] (or the shopping payload behind it) is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanRequestValidationError {
    /// The shopping payload selected no products.
    #[error("products are required")]
    NoProducts,
    /// The shopping payload carried no user location.
    #[error("user location is required")]
    MissingStart,
    /// The start point is not a valid coordinate.
    #[error("start point ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidStart {
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },
    /// A destination's location is not a valid coordinate.
    #[error(
        "destination {id} at index {index} has invalid coordinates ({latitude}, {longitude})"
    )]
    InvalidDestination {
        /// Position in the destination list.
        index: usize,
        /// Destination identifier.
        id: u64,
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },
}

impl PlanRequest {
    /// Construct a request.
    #[must_use]
    pub const fn new(start: Point, destinations: Vec<Destination>) -> Self {
        Self {
            start,
            destinations,
        }
    }

    /// Check every coordinate is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns the first invalid coordinate found, start point first.
    pub fn validate(&self) -> Result<(), PlanRequestValidationError> {
        if !self.start.is_valid() {
            return Err(PlanRequestValidationError::InvalidStart {
                latitude: self.start.latitude,
                longitude: self.start.longitude,
            });
        }
        let invalid = self
            .destinations
            .iter()
            .enumerate()
            .find(|(_, stop)| !stop.location.is_valid());
        match invalid {
            Some((index, stop)) => Err(PlanRequestValidationError::InvalidDestination {
                index,
                id: stop.id,
                latitude: stop.location.latitude,
                longitude: stop.location.longitude,
            }),
            None => Ok(()),
        }
    }
}

/// Errors returned by [`Planner::plan`].
///
/// Planners recover internally from routing-service failures and search
/// exhaustion; only malformed input reaches the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Request parameters were invalid.
    #[error("invalid plan request: {0}")]
    InvalidRequest(#[from] PlanRequestValidationError),
}

/// Which path through the planner produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlanStrategy {
    /// No destinations; nothing to plan.
    Empty,
    /// A single destination, visited directly.
    Direct,
    /// Best-first search found the route.
    Search,
    /// The search budget or deadline ran out after a complete route was
    /// found; the best route seen so far was kept.
    Interrupted,
    /// Nearest-neighbour construction produced the route.
    Greedy,
}

/// Bookkeeping about a planning call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDiagnostics {
    /// Wall-clock time spent planning.
    pub plan_time: Duration,
    /// Search states expanded; zero when no search ran.
    pub states_expanded: u64,
    /// Edge lookups answered by the haversine fallback after the provider
    /// failed.
    pub distance_fallbacks: u64,
    /// How the route was produced.
    pub strategy: PlanStrategy,
}

/// Response from a successful planning call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResponse {
    /// The ordered route.
    pub route: Route,
    /// How the route was found.
    pub diagnostics: PlanDiagnostics,
}

/// Order destinations for a shopper.
///
/// Implementations return a permutation of the request's destinations and
/// reserve errors for invalid input. Planners must be `Send + Sync` so one
/// instance can serve concurrent requests.
pub trait Planner: Send + Sync {
    /// Plan a request, producing a route or an error.
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlanError>;
}
