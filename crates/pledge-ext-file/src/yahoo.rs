//! Live last prices from Yahoo Finance.

use async_trait::async_trait;
use rust_decimal::Decimal;
use yahoo_finance_api as yahoo;

use pledge_core::{PriceQuotes, QuoteSymbol};
use pledge_traits::error::TraitError;
use pledge_traits::market_data::{PriceSource, SourceType};

/// Latest daily close per symbol from Yahoo Finance.
///
/// A symbol that fails to resolve is dropped from the result; the source
/// only errors when every requested symbol fails.
pub struct YahooPriceSource {
    provider: yahoo::YahooConnector,
}

impl YahooPriceSource {
    /// Create a new Yahoo connector.
    pub fn new() -> Result<Self, TraitError> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| TraitError::ConnectionFailed(e.to_string()))?;
        Ok(Self { provider })
    }

    async fn latest_close(&self, symbol: &QuoteSymbol) -> Result<Decimal, yahoo::YahooError> {
        let response = self.provider.get_latest_quotes(symbol.as_str(), "1d").await?;
        let quote = response.last_quote()?;
        Decimal::from_f64_retain(quote.close)
            .map(|d| d.round_dp(4))
            .ok_or(yahoo::YahooError::EmptyDataSet)
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::Snapshot
    }

    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        let mut quotes = PriceQuotes::new();
        let mut last_error = None;

        for symbol in symbols {
            match self.latest_close(symbol).await {
                Ok(price) => {
                    if let Err(e) = quotes.try_insert(symbol.clone(), price) {
                        tracing::warn!(%symbol, error = %e, "discarding quote");
                    }
                }
                Err(e) => {
                    tracing::warn!(%symbol, error = %e, "no quote from Yahoo");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if quotes.is_empty() && !symbols.is_empty() => {
                Err(TraitError::ConnectionFailed(e.to_string()))
            }
            _ => Ok(quotes),
        }
    }
}
