//! Facade crate for the Shopwalk route planner.
//!
//! This crate re-exports the core domain types and exposes the search planner
//! and the HTTP distance provider behind feature flags.

#![forbid(unsafe_code)]

pub use shopwalk_core::{
    Destination, DistanceError, DistanceProvider, HaversineDistance, LocationKey, PlanDiagnostics,
    PlanError, PlanRequest, PlanRequestValidationError, PlanResponse, PlanStrategy, Planner,
    Point, Product, ProductLocation, Route, ShoppingRequest, group_products, haversine_miles,
};

#[cfg(feature = "solver-astar")]
pub use shopwalk_solver_astar::{AStarPlanner, AStarPlannerConfig, ClosedSetPolicy, greedy_route};

#[cfg(feature = "routing-http")]
pub use shopwalk_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
