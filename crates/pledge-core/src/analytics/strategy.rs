//! Loan and cash-flow figures.

use crate::error::{PledgeError, PledgeResult};
use crate::types::StrategyParameters;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Borrowing capacity and annual cash flow of the pledge strategy.
///
/// ```text
/// loan      = market value × LTV
/// interest  = loan × loan rate
/// dividend  = market value × dividend yield
/// net       = dividend − interest
/// base MR   = 100 / LTV   (percent)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Amount that can be borrowed against the collateral.
    pub loan_amount: Decimal,

    /// Annual interest on the loan.
    pub annual_interest: Decimal,

    /// Annual dividend income of the collateral.
    pub annual_dividend: Decimal,

    /// Dividend minus interest. Negative when borrowing costs more than the
    /// collateral yields.
    pub net_annual_cashflow: Decimal,

    /// Maintenance ratio at the time of borrowing, in percent.
    ///
    /// `None` only if a zero loan-to-value reaches the calculation.
    pub maintenance_ratio_base: Option<Decimal>,
}

impl StrategyReport {
    /// Net cash flow per month.
    #[must_use]
    pub fn monthly_net_cashflow(&self) -> Decimal {
        self.net_annual_cashflow / Decimal::from(12)
    }

    /// Returns true if dividends cover the interest.
    #[must_use]
    pub fn is_cashflow_positive(&self) -> bool {
        self.net_annual_cashflow >= Decimal::ZERO
    }
}

/// Computes loan, interest, dividend and net cash flow.
///
/// No clamping is applied to the loan-to-value ratio; parameters are expected
/// to have passed [`StrategyParameters::validate`].
///
/// # Errors
///
/// Returns [`PledgeError::Overflow`] if a figure does not fit in a `Decimal`.
pub fn compute_strategy(
    total_market_value: Decimal,
    params: &StrategyParameters,
) -> PledgeResult<StrategyReport> {
    let loan_amount = total_market_value
        .checked_mul(params.loan_to_value)
        .ok_or_else(|| PledgeError::overflow("loan amount"))?;
    let annual_interest = loan_amount
        .checked_mul(params.loan_annual_rate)
        .ok_or_else(|| PledgeError::overflow("annual interest"))?;
    let annual_dividend = total_market_value
        .checked_mul(params.expected_dividend_yield)
        .ok_or_else(|| PledgeError::overflow("annual dividend"))?;
    let net_annual_cashflow = annual_dividend
        .checked_sub(annual_interest)
        .ok_or_else(|| PledgeError::overflow("net annual cash flow"))?;

    let maintenance_ratio_base = Decimal::ONE_HUNDRED.checked_div(params.loan_to_value);

    Ok(StrategyReport {
        loan_amount,
        annual_interest,
        annual_dividend,
        net_annual_cashflow,
        maintenance_ratio_base,
    })
}
