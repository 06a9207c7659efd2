//! Portfolio line representation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of underlying shares in one board lot.
pub const SHARES_PER_LOT: u32 = 1000;

/// Exchange suffix appended to bare exchange codes to form a quote symbol.
pub const DEFAULT_EXCHANGE_SUFFIX: &str = ".TW";

/// Identifier used to look up a live price.
///
/// This is the exchange-qualified form of a user symbol (e.g. `0050.TW` for
/// `0050`). Quote symbols are always trimmed and upper-cased so that lookups
/// do not depend on how the user typed the code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteSymbol(String);

impl QuoteSymbol {
    /// Creates a quote symbol from an already exchange-qualified string.
    #[must_use]
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    /// Derives the quote symbol for a user-facing exchange code.
    ///
    /// If the code already carries `suffix` anywhere (case-insensitive), it is
    /// kept as-is, so `00679B.TWO` stays an OTC symbol. Otherwise the suffix is
    /// appended.
    #[must_use]
    pub fn derive(symbol: &str, suffix: &str) -> Self {
        let upper = symbol.trim().to_uppercase();
        let suffix = suffix.trim().to_uppercase();
        if suffix.is_empty() || upper.contains(&suffix) {
            Self(upper)
        } else {
            Self(format!("{upper}{suffix}"))
        }
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuoteSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for QuoteSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single portfolio line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// User-facing exchange code (e.g. "0050").
    pub symbol: String,

    /// Symbol used to request a price, derived from `symbol`.
    pub quote_symbol: QuoteSymbol,

    /// Quantity in lots. Never negative.
    pub quantity: Decimal,
}

impl Holding {
    /// Creates a holding using the default exchange suffix.
    ///
    /// Negative quantities are clamped to zero.
    #[must_use]
    pub fn new(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self::with_suffix(symbol, quantity, DEFAULT_EXCHANGE_SUFFIX)
    }

    /// Creates a holding, deriving the quote symbol with the given suffix.
    #[must_use]
    pub fn with_suffix(symbol: impl Into<String>, quantity: Decimal, suffix: &str) -> Self {
        let symbol = symbol.into().trim().to_string();
        let quote_symbol = QuoteSymbol::derive(&symbol, suffix);
        Self {
            symbol,
            quote_symbol,
            quantity: clamp_quantity(quantity),
        }
    }

    /// Returns true if this line contributes nothing to the portfolio.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbol.is_empty() || self.quantity <= Decimal::ZERO
    }

    /// Number of underlying shares for the given lot size.
    ///
    /// `None` if the product overflows.
    #[must_use]
    pub fn shares(&self, lot_size: u32) -> Option<Decimal> {
        self.quantity.checked_mul(Decimal::from(lot_size))
    }

    /// Market value at `price` per share, or `None` on overflow.
    #[must_use]
    pub fn market_value(&self, price: Decimal, lot_size: u32) -> Option<Decimal> {
        self.shares(lot_size)?.checked_mul(price)
    }
}

fn clamp_quantity(quantity: Decimal) -> Decimal {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        tracing::debug!(%quantity, "clamping negative lot quantity to zero");
        Decimal::ZERO
    } else {
        quantity
    }
}
