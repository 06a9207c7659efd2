//! Strategy parameters for one calculation run.

use super::QuoteSymbol;
use crate::error::{PledgeError, PledgeResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Benchmark used as reinvestment target when none is given.
pub const DEFAULT_REINVESTMENT_SYMBOL: &str = "0050.TW";

/// Immutable input bundle for one calculation run.
///
/// All rates are fractions (0.0258 for 2.58%). Use
/// [`StrategyParameters::builder`] to construct a validated instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    /// Annual interest rate on the borrowed cash.
    pub loan_annual_rate: Decimal,

    /// Fraction of collateral market value that is borrowed, in `(0, 1]`.
    pub loan_to_value: Decimal,

    /// Annual dividend yield assumed across the whole portfolio.
    pub expected_dividend_yield: Decimal,

    /// Expected annual price return of the reinvestment target (may be negative).
    pub reinvestment_growth_rate: Decimal,

    /// Quote symbol used to price the reinvestment target.
    pub reinvestment_quote_symbol: QuoteSymbol,
}

impl Default for StrategyParameters {
    fn default() -> Self {
        Self {
            loan_annual_rate: dec!(0.0258),
            loan_to_value: dec!(0.50),
            expected_dividend_yield: dec!(0.06),
            reinvestment_growth_rate: dec!(0.12),
            reinvestment_quote_symbol: QuoteSymbol::new(DEFAULT_REINVESTMENT_SYMBOL),
        }
    }
}

impl StrategyParameters {
    /// Creates a builder seeded with the default parameters.
    #[must_use]
    pub fn builder() -> StrategyParametersBuilder {
        StrategyParametersBuilder::new()
    }

    /// Checks every parameter against its accepted range.
    ///
    /// Out-of-range loan-to-value ratios are rejected rather than clamped.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> PledgeResult<()> {
        if self.loan_to_value <= Decimal::ZERO || self.loan_to_value > Decimal::ONE {
            return Err(PledgeError::invalid_parameter(
                "loan_to_value",
                self.loan_to_value,
                "must be greater than 0 and at most 1",
            ));
        }
        if self.loan_annual_rate.is_sign_negative() && !self.loan_annual_rate.is_zero() {
            return Err(PledgeError::invalid_parameter(
                "loan_annual_rate",
                self.loan_annual_rate,
                "must not be negative",
            ));
        }
        if self.expected_dividend_yield.is_sign_negative()
            && !self.expected_dividend_yield.is_zero()
        {
            return Err(PledgeError::invalid_parameter(
                "expected_dividend_yield",
                self.expected_dividend_yield,
                "must not be negative",
            ));
        }
        if self.reinvestment_quote_symbol.as_str().is_empty() {
            return Err(PledgeError::invalid_parameter(
                "reinvestment_quote_symbol",
                "",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Builder for [`StrategyParameters`].
///
/// Setters take fractions; the `*_pct` variants take percentages as typed in
/// an input form (2.58 for 2.58%).
#[derive(Debug, Clone, Default)]
pub struct StrategyParametersBuilder {
    params: StrategyParameters,
}

impl StrategyParametersBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the annual loan interest rate.
    #[must_use]
    pub fn loan_annual_rate(mut self, rate: Decimal) -> Self {
        self.params.loan_annual_rate = rate;
        self
    }

    /// Sets the annual loan interest rate from a percentage.
    #[must_use]
    pub fn loan_annual_rate_pct(self, pct: Decimal) -> Self {
        self.loan_annual_rate(pct / Decimal::ONE_HUNDRED)
    }

    /// Sets the loan-to-value ratio.
    #[must_use]
    pub fn loan_to_value(mut self, ltv: Decimal) -> Self {
        self.params.loan_to_value = ltv;
        self
    }

    /// Sets the loan-to-value ratio from a percentage.
    #[must_use]
    pub fn loan_to_value_pct(self, pct: Decimal) -> Self {
        self.loan_to_value(pct / Decimal::ONE_HUNDRED)
    }

    /// Sets the expected dividend yield.
    #[must_use]
    pub fn expected_dividend_yield(mut self, yield_: Decimal) -> Self {
        self.params.expected_dividend_yield = yield_;
        self
    }

    /// Sets the expected dividend yield from a percentage.
    #[must_use]
    pub fn expected_dividend_yield_pct(self, pct: Decimal) -> Self {
        self.expected_dividend_yield(pct / Decimal::ONE_HUNDRED)
    }

    /// Sets the reinvestment growth rate.
    #[must_use]
    pub fn reinvestment_growth_rate(mut self, rate: Decimal) -> Self {
        self.params.reinvestment_growth_rate = rate;
        self
    }

    /// Sets the reinvestment growth rate from a percentage.
    #[must_use]
    pub fn reinvestment_growth_rate_pct(self, pct: Decimal) -> Self {
        self.reinvestment_growth_rate(pct / Decimal::ONE_HUNDRED)
    }

    /// Sets the reinvestment target's quote symbol.
    #[must_use]
    pub fn reinvestment_quote_symbol(mut self, symbol: impl Into<QuoteSymbol>) -> Self {
        self.params.reinvestment_quote_symbol = symbol.into();
        self
    }

    /// Builds and validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InvalidParameter`] if any value is out of range.
    pub fn build(self) -> PledgeResult<StrategyParameters> {
        self.params.validate()?;
        Ok(self.params)
    }
}
