//! HTTP-based distance providers for routing services.
//!
//! This module provides [`HttpDistanceProvider`], an implementation of
//! [`shopwalk_core::DistanceProvider`] that asks an OSRM routing service for
//! the driving distance between two points.
//!
//! # Architecture
//!
//! The provider calls the OSRM Route API once per point pair and converts the
//! returned distance from metres to miles. The synchronous
//! [`DistanceProvider`](shopwalk_core::DistanceProvider) trait is implemented
//! by blocking on async HTTP calls internally, keeping planners embeddable in
//! synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use shopwalk_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
//! use shopwalk_core::{DistanceProvider, Point};
//! use std::time::Duration;
//!
//! let config = HttpDistanceProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpDistanceProvider::with_config(config)?;
//!
//! let miles = provider.distance(Point::new(51.5, -0.1), Point::new(51.6, -0.2))?;
//! println!("Driving distance: {miles:.1} mi");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpDistanceProvider, HttpDistanceProviderConfig,
    METRES_PER_MILE, ProviderBuildError,
};
