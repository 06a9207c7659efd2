//! Projection of redeploying the borrowed cash.

use crate::error::{PledgeError, PledgeResult};
use crate::types::{PriceQuotes, QuoteSymbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the reinvestment price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReinvestmentPriceSource {
    /// Quoted by the price source.
    Quoted,
    /// Configured fallback, used because the target had no quote.
    Fallback,
}

/// Reinvestment target price and its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinvestmentPrice {
    /// Unit price.
    pub price: Decimal,
    /// Quoted or fallback.
    pub source: ReinvestmentPriceSource,
}

/// Picks the quoted price for `symbol`, or `fallback` if it has none.
#[must_use]
pub fn resolve_reinvestment_price(
    quotes: &PriceQuotes,
    symbol: &QuoteSymbol,
    fallback: Decimal,
) -> ReinvestmentPrice {
    match quotes.get(symbol) {
        Some(price) => ReinvestmentPrice {
            price,
            source: ReinvestmentPriceSource::Quoted,
        },
        None => {
            tracing::debug!(%symbol, %fallback, "no quote for reinvestment target, using fallback");
            ReinvestmentPrice {
                price: fallback,
                source: ReinvestmentPriceSource::Fallback,
            }
        }
    }
}

/// Expected outcome of buying the reinvestment target with the loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinvestmentProjection {
    /// Unit price of the target.
    pub reinvestment_price: Decimal,

    /// Whether the price was quoted or a fallback.
    pub price_source: ReinvestmentPriceSource,

    /// Shares the loan can buy. `None` when the price is not positive.
    pub shares_acquirable: Option<Decimal>,

    /// Expected annual return on the redeployed loan.
    pub expected_reinvestment_return: Decimal,

    /// Reinvestment return plus the strategy's net cash flow.
    pub total_expected_net_result: Decimal,
}

impl ReinvestmentProjection {
    /// Shares acquirable expressed in lots of `lot_size` shares.
    #[must_use]
    pub fn lots_acquirable(&self, lot_size: u32) -> Option<Decimal> {
        if lot_size == 0 {
            return None;
        }
        self.shares_acquirable
            .map(|shares| shares / Decimal::from(lot_size))
    }
}

/// Projects reinvestment of `loan_amount` into a target priced at
/// `reinvestment_price` and growing at `growth_rate` per year.
///
/// The total net result excludes cash flow; use
/// [`project_reinvestment_with_cashflow`] to include it.
///
/// # Errors
///
/// Returns [`PledgeError::Overflow`] if the expected return does not fit in
/// a `Decimal`.
pub fn project_reinvestment(
    loan_amount: Decimal,
    reinvestment_price: Decimal,
    growth_rate: Decimal,
) -> PledgeResult<ReinvestmentProjection> {
    project_reinvestment_with_cashflow(
        loan_amount,
        ReinvestmentPrice {
            price: reinvestment_price,
            source: ReinvestmentPriceSource::Quoted,
        },
        growth_rate,
        Decimal::ZERO,
    )
}

/// Projects reinvestment and adds the strategy's net annual cash flow to
/// the total expected result.
///
/// # Errors
///
/// Same as [`project_reinvestment`].
pub fn project_reinvestment_with_cashflow(
    loan_amount: Decimal,
    price: ReinvestmentPrice,
    growth_rate: Decimal,
    net_annual_cashflow: Decimal,
) -> PledgeResult<ReinvestmentProjection> {
    let shares_acquirable = if price.price > Decimal::ZERO {
        loan_amount.checked_div(price.price)
    } else {
        None
    };
    let expected_reinvestment_return = loan_amount
        .checked_mul(growth_rate)
        .ok_or_else(|| PledgeError::overflow("expected reinvestment return"))?;
    let total_expected_net_result = expected_reinvestment_return
        .checked_add(net_annual_cashflow)
        .ok_or_else(|| PledgeError::overflow("total expected net result"))?;

    Ok(ReinvestmentProjection {
        reinvestment_price: price.price,
        price_source: price.source,
        shares_acquirable,
        expected_reinvestment_return,
        total_expected_net_result,
    })
}
