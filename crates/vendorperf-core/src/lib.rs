//! Core types and logic for the vendor performance tracker.
//!
//! This crate holds the domain model, the [`store::PerformanceStore`]
//! abstraction, the pure metrics engine and the lifecycle coordinator that
//! decides when vendor metrics are recomputed. It has no HTTP or database
//! dependencies.

pub mod error;
pub mod history;
pub mod lifecycle;
pub mod locks;
pub mod metrics;
pub mod order;
pub mod store;
pub mod vendor;

pub use error::{Error, Result};
pub use lifecycle::PerformanceTracker;
