//! Portfolio valuation.
//!
//! Values each line at `quantity × lot size × price` and aggregates the total.
//! A line without a quote is valued at zero and flagged, so one bad quote
//! never invalidates the rest of the portfolio.

use super::parallel::{maybe_parallel_fold, maybe_parallel_map};
use crate::error::{PledgeError, PledgeResult};
use crate::types::{Holding, PolicyConfig, PriceQuotes, QuoteSymbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a line's price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceStatus {
    /// The price source returned a price (possibly zero).
    Quoted,
    /// No price was available; the line is valued at zero.
    Missing,
}

/// Valuation of one portfolio line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    /// User-facing symbol.
    pub symbol: String,

    /// Symbol the price was looked up with.
    pub quote_symbol: QuoteSymbol,

    /// Unit price used (zero when missing).
    pub price: Decimal,

    /// Quantity in lots.
    pub quantity: Decimal,

    /// Market value of the line.
    pub market_value: Decimal,

    /// Whether the price was quoted or missing.
    pub price_status: PriceStatus,
}

impl HoldingValuation {
    /// Returns true if the line had no quote.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.price_status == PriceStatus::Missing
    }
}

/// Per-line valuations plus the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    /// Lines in input order.
    pub lines: Vec<HoldingValuation>,

    /// Sum of line market values.
    pub total_market_value: Decimal,
}

impl ValuationReport {
    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of lines with a quoted price.
    #[must_use]
    pub fn priced_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_missing()).count()
    }

    /// Quote symbols that had no price.
    #[must_use]
    pub fn missing_symbols(&self) -> Vec<&QuoteSymbol> {
        self.lines
            .iter()
            .filter(|l| l.is_missing())
            .map(|l| &l.quote_symbol)
            .collect()
    }

    /// Each line's share of the total market value, in input order.
    ///
    /// All entries are `None` when the total is zero.
    #[must_use]
    pub fn weights(&self) -> Vec<Option<Decimal>> {
        self.lines
            .iter()
            .map(|l| {
                if self.total_market_value > Decimal::ZERO {
                    l.market_value.checked_div(self.total_market_value)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Values holdings with standard lot size.
///
/// Unknown prices are valued at zero and flagged [`PriceStatus::Missing`].
///
/// # Errors
///
/// Returns [`PledgeError::InvalidHolding`] if a line's market value does not
/// fit in a `Decimal`, or [`PledgeError::Overflow`] if the total does not.
///
/// # Example
///
/// ```
/// use pledge_core::prelude::*;
///
/// let holdings = vec![Holding::new("0050", dec!(10))];
/// let quotes = PriceQuotes::try_from_pairs([("0050.TW", dec!(150))]).unwrap();
///
/// let report = value_portfolio(&holdings, &quotes)?;
/// assert_eq!(report.total_market_value, dec!(1_500_000));
/// # Ok::<(), PledgeError>(())
/// ```
pub fn value_portfolio(
    holdings: &[Holding],
    quotes: &PriceQuotes,
) -> PledgeResult<ValuationReport> {
    value_portfolio_with(holdings, quotes, &PolicyConfig::default())
}

/// Values holdings using the lot size and parallelism settings in `config`.
///
/// # Errors
///
/// Same as [`value_portfolio`].
pub fn value_portfolio_with(
    holdings: &[Holding],
    quotes: &PriceQuotes,
    config: &PolicyConfig,
) -> PledgeResult<ValuationReport> {
    let lot_size = config.lot_size;

    let lines = maybe_parallel_map(holdings, config, |h| -> PledgeResult<HoldingValuation> {
        let (price, price_status) = match quotes.get(&h.quote_symbol) {
            Some(p) => (p, PriceStatus::Quoted),
            None => (Decimal::ZERO, PriceStatus::Missing),
        };
        let market_value = h.market_value(price, lot_size).ok_or_else(|| {
            PledgeError::invalid_holding(&h.symbol, "market value is out of range")
        })?;
        Ok(HoldingValuation {
            symbol: h.symbol.clone(),
            quote_symbol: h.quote_symbol.clone(),
            price,
            quantity: h.quantity,
            market_value,
            price_status,
        })
    })
    .into_iter()
    .collect::<PledgeResult<Vec<_>>>()?;

    let total_market_value = maybe_parallel_fold(
        &lines,
        config,
        Some(Decimal::ZERO),
        |acc, line| acc.and_then(|a| a.checked_add(line.market_value)),
        |a, b| a.zip(b).and_then(|(a, b)| a.checked_add(b)),
    )
    .ok_or_else(|| PledgeError::overflow("total market value"))?;

    Ok(ValuationReport {
        lines,
        total_market_value,
    })
}
