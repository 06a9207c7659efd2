//! Resolved price quotes handed to the engine.

use super::QuoteSymbol;
use crate::error::{PledgeError, PledgeResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Last-traded unit prices keyed by quote symbol.
///
/// Every stored price is non-negative; negative prices are rejected on
/// insertion. A symbol that is absent means "price unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<QuoteSymbol, Decimal>",
    into = "HashMap<QuoteSymbol, Decimal>"
)]
pub struct PriceQuotes {
    prices: HashMap<QuoteSymbol, Decimal>,
}

impl PriceQuotes {
    /// Creates an empty quote set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a quote set from `(symbol, price)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InvalidQuote`] for the first negative price.
    pub fn try_from_pairs<S, I>(pairs: I) -> PledgeResult<Self>
    where
        S: Into<QuoteSymbol>,
        I: IntoIterator<Item = (S, Decimal)>,
    {
        let mut quotes = Self::new();
        for (symbol, price) in pairs {
            quotes.try_insert(symbol, price)?;
        }
        Ok(quotes)
    }

    /// Inserts or replaces a price.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InvalidQuote`] if `price` is negative.
    pub fn try_insert(&mut self, symbol: impl Into<QuoteSymbol>, price: Decimal) -> PledgeResult<()> {
        let symbol = symbol.into();
        if price.is_sign_negative() && !price.is_zero() {
            return Err(PledgeError::invalid_quote(symbol.as_str(), price));
        }
        self.prices.insert(symbol, price);
        Ok(())
    }

    /// Returns the quoted price, if any.
    #[must_use]
    pub fn get(&self, symbol: &QuoteSymbol) -> Option<Decimal> {
        self.prices.get(symbol).copied()
    }

    /// Returns true if a price is known for `symbol`.
    #[must_use]
    pub fn contains(&self, symbol: &QuoteSymbol) -> bool {
        self.prices.contains_key(symbol)
    }

    /// Number of quoted symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns true if no symbol is quoted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Iterates over `(symbol, price)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuoteSymbol, Decimal)> {
        self.prices.iter().map(|(s, p)| (s, *p))
    }

    /// Merges another quote set into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: PriceQuotes) {
        self.prices.extend(other.prices);
    }

    /// Keeps only the quotes for the requested symbols.
    #[must_use]
    pub fn restricted_to(&self, symbols: &[QuoteSymbol]) -> Self {
        Self {
            prices: symbols
                .iter()
                .filter_map(|s| self.prices.get(s).map(|p| (s.clone(), *p)))
                .collect(),
        }
    }
}

impl TryFrom<HashMap<QuoteSymbol, Decimal>> for PriceQuotes {
    type Error = PledgeError;

    fn try_from(prices: HashMap<QuoteSymbol, Decimal>) -> Result<Self, Self::Error> {
        Self::try_from_pairs(prices)
    }
}

impl From<PriceQuotes> for HashMap<QuoteSymbol, Decimal> {
    fn from(quotes: PriceQuotes) -> Self {
        quotes.prices
    }
}

/// Outcome of asking a price source for quotes.
///
/// A source that fails entirely is reported as [`PriceFeed::Unavailable`]
/// instead of an empty quote set, so "no data" stays distinguishable from a
/// genuine zero price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PriceFeed {
    /// The source answered; individual symbols may still be absent.
    Resolved(PriceQuotes),
    /// The source could not be queried at all.
    Unavailable {
        /// Description of the failure.
        reason: String,
    },
}

impl PriceFeed {
    /// Creates an unavailable feed.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns the resolved quotes, if the source answered.
    #[must_use]
    pub fn quotes(&self) -> Option<&PriceQuotes> {
        match self {
            Self::Resolved(quotes) => Some(quotes),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns true if the source answered.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl From<PriceQuotes> for PriceFeed {
    fn from(quotes: PriceQuotes) -> Self {
        Self::Resolved(quotes)
    }
}
