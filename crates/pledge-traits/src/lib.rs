//! # Pledge Traits
//!
//! Trait definitions for price sources used by the pledge engine.
//!
//! This crate contains only the [`PriceSource`] seam and its error type.
//! Implementations (static maps, files, caches, live feeds) live in
//! extension crates.
//!
//! ## Module Structure
//!
//! - [`market_data`]: The price source trait and the feed resolver
//! - [`error`]: Error type shared by all sources

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;

// Re-export commonly used types
pub use error::TraitError;
pub use market_data::{fetch_price_feed, PriceSource, SourceType};
