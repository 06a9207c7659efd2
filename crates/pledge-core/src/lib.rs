//! # Pledge Core
//!
//! Valuation, cash-flow and margin stress engine for pledge loans.
//!
//! A pledge loan borrows cash against exchange-traded holdings up to a
//! loan-to-value ratio. This crate values the collateral, derives the loan,
//! its interest cost and the collateral's dividend income, projects the
//! redeployment of the borrowed cash, and tabulates the maintenance ratio
//! under a set of price shocks.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Fail soft**: Missing quotes and zero denominators become flags and
//!   `None` values in the reports; overflowing magnitudes become errors, never panics
//! - **Exact arithmetic**: Money and ratios are [`rust_decimal::Decimal`]
//! - **Config-driven parallelism**: Optional rayon support with threshold-based switching
//!
//! ## Quick Start
//!
//! ```
//! use pledge_core::prelude::*;
//!
//! let holdings = vec![Holding::new("0050", dec!(10))];
//! let quotes = PriceQuotes::try_from_pairs([("0050.TW", dec!(150))])?;
//!
//! let valuation = value_portfolio(&holdings, &quotes)?;
//! let params = StrategyParameters::builder()
//!     .loan_to_value_pct(dec!(50))
//!     .loan_annual_rate_pct(dec!(2.58))
//!     .expected_dividend_yield_pct(dec!(6))
//!     .build()?;
//!
//! let strategy = compute_strategy(valuation.total_market_value, &params)?;
//! assert_eq!(strategy.net_annual_cashflow, dec!(70_650));
//!
//! let rows = stress_test(valuation.total_market_value, strategy.loan_amount, &standard_shocks())?;
//! assert_eq!(rows[0].maintenance_ratio, Some(dec!(200)));
//! # Ok::<(), PledgeError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`analytics`] - Valuation, strategy cash flow, reinvestment, full analysis
//! - [`stress`] - Shock scenarios and maintenance-ratio table
//! - [`input`] - Caller-owned input rows
//! - [`types`] - Core types (Holding, PriceQuotes, StrategyParameters, PolicyConfig)
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel valuation for large portfolios

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod error;
pub mod input;
pub mod stress;
pub mod types;

// Re-export error types at crate root
pub use error::{PledgeError, PledgeResult};

// Re-export main types
pub use types::{
    Holding, PolicyConfig, PriceFeed, PriceQuotes, QuoteSymbol, StrategyParameters,
    StrategyParametersBuilder, DEFAULT_EXCHANGE_SUFFIX, DEFAULT_REINVESTMENT_SYMBOL,
    SHARES_PER_LOT,
};

// Re-export analytics types and functions
pub use analytics::{
    analyze, compute_strategy, project_reinvestment, project_reinvestment_with_cashflow,
    resolve_reinvestment_price, value_portfolio, value_portfolio_with, AnalysisOutcome,
    AnalysisReport, HoldingValuation, PriceStatus, ReinvestmentPrice, ReinvestmentPriceSource,
    ReinvestmentProjection, StrategyReport, ValuationReport,
};

// Re-export stress testing types and functions
pub use stress::{
    maintenance_ratio, shock_label, standard_shocks, stress_test, stress_test_with_threshold,
    summarize_stress, MarginStatus, StressSummary, StressTestRow, MARGIN_CALL_THRESHOLD,
};

// Re-export input rows
pub use input::{quote_symbols, InputRow, PortfolioInput};

/// Prelude module for convenient imports.
///
/// ```rust
/// use pledge_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{PledgeError, PledgeResult};

    pub use crate::types::{
        Holding, PolicyConfig, PriceFeed, PriceQuotes, QuoteSymbol, StrategyParameters,
    };

    pub use crate::analytics::{
        analyze, compute_strategy, project_reinvestment, value_portfolio, AnalysisOutcome,
        AnalysisReport, PriceStatus, ReinvestmentProjection, StrategyReport, ValuationReport,
    };

    pub use crate::stress::{
        standard_shocks, stress_test, MarginStatus, StressSummary, StressTestRow,
        MARGIN_CALL_THRESHOLD,
    };

    pub use crate::input::{InputRow, PortfolioInput};

    // Re-export commonly used types from dependencies
    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}
