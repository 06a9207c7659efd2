//! Domain types for the pledge engine.
//!
//! - [`Holding`]: A portfolio line in lots, with its derived [`QuoteSymbol`]
//! - [`PriceQuotes`] / [`PriceFeed`]: Resolved prices and the fetch outcome
//! - [`StrategyParameters`]: Loan, dividend and reinvestment assumptions
//! - [`PolicyConfig`]: Policy constants and parallelism settings

mod config;
mod holding;
mod parameters;
mod quotes;

pub use config::PolicyConfig;
pub use holding::{Holding, QuoteSymbol, DEFAULT_EXCHANGE_SUFFIX, SHARES_PER_LOT};
pub use parameters::{StrategyParameters, StrategyParametersBuilder, DEFAULT_REINVESTMENT_SYMBOL};
pub use quotes::{PriceFeed, PriceQuotes};
