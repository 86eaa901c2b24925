//! # Poolshare Allocation Engine
//!
//! This crate distributes the net result of the subscription pool among the
//! operator and the investors. It is the system's single source of truth
//! for who is owed what.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AllocationEngine` is a stateless
//!   calculator. It takes an immutable `Snapshot` as input and produces
//!   `PoolStats` or a `Breakdown` as output. Every call is independent and
//!   idempotent, so callers may share one engine freely.
//! - **Two apportionment bases:** profit stocks flagged as post-cutoff pay
//!   out on the Special investor weights, while losses and unfilled costs
//!   always stay on the Normal weights. The basis is carried as a variant
//!   on each stock, and the weight rule lives in exactly one place.
//!
//! ## Public API
//!
//! - `AllocationEngine`: the main struct that contains the calculation logic.
//! - `PoolStats` / `InvestorShare`: the aggregate distribution record.
//! - `Breakdown` / `LineItem`: per-instrument detail for one stakeholder.
//! - `AllocationError`: the specific error types that can be returned from
//!   this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AllocationEngine;
pub use error::AllocationError;
pub use report::{Breakdown, InvestorShare, LineItem, PoolStats};
