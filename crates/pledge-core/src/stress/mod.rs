//! Margin stress testing.
//!
//! This module provides:
//! - The standard price-shock scenario set and the margin-call threshold
//! - Maintenance-ratio rows per scenario, with safe / at-risk classification
//! - A summary including the shock at which a margin call would trigger
//!
//! The loan amount is held fixed across scenarios; only the collateral value
//! moves.

mod maintenance;
mod scenarios;

pub use maintenance::*;
pub use scenarios::*;
