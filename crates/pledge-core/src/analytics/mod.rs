//! Portfolio valuation, strategy cash flow and reinvestment analytics.
//!
//! All functions are pure: they take holdings, resolved quotes and parameters
//! and return plain report structs.

mod parallel;
mod reinvestment;
mod strategy;
mod summary;
mod valuation;

pub use parallel::{maybe_parallel_fold, maybe_parallel_map};
pub use reinvestment::{
    project_reinvestment, project_reinvestment_with_cashflow, resolve_reinvestment_price,
    ReinvestmentPrice, ReinvestmentPriceSource, ReinvestmentProjection,
};
pub use strategy::{compute_strategy, StrategyReport};
pub use summary::{analyze, AnalysisOutcome, AnalysisReport};
pub use valuation::{
    value_portfolio, value_portfolio_with, HoldingValuation, PriceStatus, ValuationReport,
};
