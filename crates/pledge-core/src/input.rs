//! Caller-owned portfolio input rows.
//!
//! An input surface (form, CLI, API) edits a variable-length list of
//! `(symbol, quantity)` rows. The engine only ever sees the final
//! [`Holding`] list produced by [`PortfolioInput::holdings`].

use crate::error::{PledgeError, PledgeResult};
use crate::types::{Holding, PolicyConfig, QuoteSymbol, StrategyParameters};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of rows a fresh input starts with.
pub const DEFAULT_ROW_COUNT: usize = 3;

/// One editable input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRow {
    /// Exchange code as typed by the user.
    pub symbol: String,
    /// Quantity in lots.
    pub quantity: Decimal,
}

impl InputRow {
    /// Creates a row.
    #[must_use]
    pub fn new(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
        }
    }
}

/// Ordered list of portfolio input rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioInput {
    rows: Vec<InputRow>,
}

impl Default for PortfolioInput {
    /// Three rows, the first two pre-filled with `0050` and `00878` at zero lots.
    fn default() -> Self {
        let mut rows = vec![
            InputRow::new("0050", Decimal::ZERO),
            InputRow::new("00878", Decimal::ZERO),
        ];
        rows.resize(DEFAULT_ROW_COUNT, InputRow::default());
        Self { rows }
    }
}

impl PortfolioInput {
    /// Creates an input with no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates an input from existing rows.
    #[must_use]
    pub fn from_rows(rows: Vec<InputRow>) -> Self {
        Self { rows }
    }

    /// Appends a blank row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(InputRow::default());
        self.rows.len() - 1
    }

    /// Appends a filled row and returns its index.
    pub fn push_row(&mut self, symbol: impl Into<String>, quantity: Decimal) -> usize {
        self.rows.push(InputRow::new(symbol, quantity));
        self.rows.len() - 1
    }

    /// Removes and returns the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InvalidHolding`] if `index` is out of range.
    pub fn remove_row(&mut self, index: usize) -> PledgeResult<InputRow> {
        if index >= self.rows.len() {
            return Err(out_of_range(index, self.rows.len()));
        }
        Ok(self.rows.remove(index))
    }

    /// Replaces the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PledgeError::InvalidHolding`] if `index` is out of range.
    pub fn set_row(
        &mut self,
        index: usize,
        symbol: impl Into<String>,
        quantity: Decimal,
    ) -> PledgeResult<()> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
        *row = InputRow::new(symbol, quantity);
        Ok(())
    }

    /// Current rows in order.
    #[must_use]
    pub fn rows(&self) -> &[InputRow] {
        &self.rows
    }

    /// Number of rows, including blank ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts rows to holdings.
    ///
    /// Blank symbols are skipped. Zero quantities are kept so that the
    /// valuation table can still show the line; [`crate::analyze`] drops them.
    #[must_use]
    pub fn holdings(&self, config: &PolicyConfig) -> Vec<Holding> {
        self.rows
            .iter()
            .filter(|r| !r.symbol.trim().is_empty())
            .map(|r| Holding::with_suffix(r.symbol.as_str(), r.quantity, &config.exchange_suffix))
            .collect()
    }
}

fn out_of_range(index: usize, len: usize) -> PledgeError {
    PledgeError::invalid_holding(
        format!("row {index}"),
        format!("index out of range for {len} rows"),
    )
}

/// Symbols to request from a price source: every holding's quote symbol plus
/// the reinvestment target, in first-seen order without duplicates.
#[must_use]
pub fn quote_symbols(holdings: &[Holding], params: &StrategyParameters) -> Vec<QuoteSymbol> {
    let mut symbols: Vec<QuoteSymbol> = Vec::with_capacity(holdings.len() + 1);
    for symbol in holdings
        .iter()
        .map(|h| &h.quote_symbol)
        .chain(std::iter::once(&params.reinvestment_quote_symbol))
    {
        if !symbols.contains(symbol) {
            symbols.push(symbol.clone());
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_rows() {
        let input = PortfolioInput::default();
        assert_eq!(input.len(), 3);
        assert_eq!(input.rows()[0].symbol, "0050");
        assert_eq!(input.rows()[1].symbol, "00878");
        assert!(input.rows()[2].symbol.is_empty());
    }

    #[test]
    fn test_add_and_remove() {
        let mut input = PortfolioInput::empty();
        assert!(input.is_empty());

        let idx = input.add_row();
        assert_eq!(idx, 0);
        input.set_row(idx, "2330", dec!(2)).unwrap();
        input.push_row("0056", dec!(5));

        let removed = input.remove_row(0).unwrap();
        assert_eq!(removed.symbol, "2330");
        assert_eq!(input.rows()[0].symbol, "0056");
    }

    #[test]
    fn test_out_of_range() {
        let mut input = PortfolioInput::empty();
        assert!(input.remove_row(0).is_err());
        assert!(input.set_row(3, "0050", dec!(1)).is_err());
    }

    #[test]
    fn test_holdings_skip_blank() {
        let mut input = PortfolioInput::default();
        input.set_row(0, "0050", dec!(10)).unwrap();

        let holdings = input.holdings(&PolicyConfig::default());
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].quote_symbol.as_str(), "0050.TW");
        assert_eq!(holdings[1].quantity, Decimal::ZERO);
    }

    #[test]
    fn test_holdings_use_configured_suffix() {
        let input = PortfolioInput::from_rows(vec![InputRow::new("6488", dec!(1))]);
        let config = PolicyConfig::default().with_exchange_suffix(".TWO");
        assert_eq!(input.holdings(&config)[0].quote_symbol.as_str(), "6488.TWO");
    }

    #[test]
    fn test_quote_symbols_dedup() {
        let holdings = vec![
            Holding::new("0050", dec!(1)),
            Holding::new("00878", dec!(1)),
            Holding::new("0050.tw", dec!(1)),
        ];
        let symbols = quote_symbols(&holdings, &StrategyParameters::default());
        let names: Vec<&str> = symbols.iter().map(QuoteSymbol::as_str).collect();
        assert_eq!(names, vec!["0050.TW", "00878.TW"]);
    }

    #[test]
    fn test_quote_symbols_include_target() {
        let holdings = vec![Holding::new("00878", dec!(1))];
        let symbols = quote_symbols(&holdings, &StrategyParameters::default());
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[1].as_str(), "0050.TW");
    }
}
