//! External data adapters for the Shopwalk engine.
//!
//! Responsibilities:
//! - Provide adapters that answer core traits from HTTP services.
//! - Encapsulate wire formats of those services.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `shopwalk-core` and the solvers).
//! - Fail fast with a typed error; recovery belongs to the caller.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state; clients are built per provider instance.

#![forbid(unsafe_code)]

pub mod routing;
