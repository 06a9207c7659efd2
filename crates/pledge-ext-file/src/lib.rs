//! # Pledge Ext File
//!
//! Price sources for the pledge engine.
//!
//! This crate provides default implementations for manual runs, EOD files and tests:
//! - Static and empty in-memory sources
//! - CSV and JSON price files
//! - A TTL cache wrapping any other source
//! - Yahoo Finance latest close (`yahoo` feature)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod market_data;
#[cfg(feature = "yahoo")]
mod yahoo;

pub use cache::*;
pub use market_data::*;
#[cfg(feature = "yahoo")]
pub use yahoo::*;

use std::path::Path;

use pledge_traits::error::TraitError;
use pledge_traits::market_data::PriceSource;

/// Create a file-based price source, choosing the format from the extension.
///
/// `.json` files are read as JSON; anything else as CSV.
pub fn create_file_price_source(
    path: impl AsRef<Path>,
) -> Result<Box<dyn PriceSource>, TraitError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(Box::new(JsonPriceSource::new(path)?))
    } else {
        Ok(Box::new(CsvPriceSource::new(path)?))
    }
}
