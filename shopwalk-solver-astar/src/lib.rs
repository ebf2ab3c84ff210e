//! Best-first route planner for Shopwalk.
//!
//! This crate provides [`AStarPlanner`], the default implementation of the
//! [`Planner`](shopwalk_core::Planner) trait. It treats a shopping trip as an
//! open travelling-salesman path: start at the shopper's position, visit every
//! destination once and stop at the last one.
//!
//! The search explores `(location, visited set)` states in order of
//! `cost so far + heuristic`, where the heuristic is the cost of a minimum
//! spanning tree over the destinations still to visit ([`mst_cost`]). Edge
//! costs come from an injected [`DistanceProvider`](shopwalk_core::DistanceProvider)
//! and fall back to the haversine distance per edge when the provider fails.
//! When the budget or deadline stops the search after it has completed a
//! route, the best route so far is kept. Otherwise, when the search cannot
//! finish (budget, deadline, or too many destinations), the planner answers
//! with a nearest-neighbour route ([`greedy_route`]).

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod costs;
mod greedy;
mod mst;
mod search;
mod solver;
mod state;

pub use costs::EdgeCosts;
pub use greedy::{greedy_order, greedy_route};
pub use mst::mst_cost;
pub use search::{
    ClosedSetPolicy, SearchBudget, SearchExhausted, SearchOptions, SearchOutcome, search,
};
pub use solver::{AStarPlanner, AStarPlannerConfig, DEFAULT_MAX_SEARCH_DESTINATIONS};
pub use state::VisitedSet;
