//! Market data source traits.
//!
//! A [`PriceSource`] answers one question: the last-traded price for each of
//! a set of quote symbols. Sources may omit symbols they cannot price.

use async_trait::async_trait;
use pledge_core::{PriceFeed, PriceQuotes, QuoteSymbol};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::TraitError;

/// Source type for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response (REST APIs)
    Snapshot,
    /// File-based (CSV, JSON)
    File,
    /// In-memory cache in front of another source
    Cache,
    /// Manual entry
    Manual,
}

/// Trait for last-price providers.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Get the last price for each symbol.
    ///
    /// Symbols the source cannot price are absent from the result. An error
    /// means the source as a whole could not be reached.
    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError>;
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Arc<T> {
    fn source_type(&self) -> SourceType {
        (**self).source_type()
    }

    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        (**self).get_last_prices(symbols).await
    }
}

#[async_trait]
impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    fn source_type(&self) -> SourceType {
        (**self).source_type()
    }

    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        (**self).get_last_prices(symbols).await
    }
}

/// Resolves a [`PriceFeed`] from `source`.
///
/// Source failures are logged and reported as [`PriceFeed::Unavailable`]
/// rather than returned, so the analysis can report insufficient input.
pub async fn fetch_price_feed<S>(source: &S, symbols: &[QuoteSymbol]) -> PriceFeed
where
    S: PriceSource + ?Sized,
{
    match source.get_last_prices(symbols).await {
        Ok(quotes) => {
            tracing::debug!(
                requested = symbols.len(),
                quoted = quotes.len(),
                source = ?source.source_type(),
                "price feed resolved"
            );
            PriceFeed::Resolved(quotes)
        }
        Err(e) => {
            tracing::warn!(error = %e, source = ?source.source_type(), "price source failed");
            PriceFeed::unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FixedSource(PriceQuotes);

    #[async_trait]
    impl PriceSource for FixedSource {
        fn source_type(&self) -> SourceType {
            SourceType::Manual
        }

        async fn get_last_prices(
            &self,
            symbols: &[QuoteSymbol],
        ) -> Result<PriceQuotes, TraitError> {
            Ok(self.0.restricted_to(symbols))
        }
    }

    struct DownSource;

    #[async_trait]
    impl PriceSource for DownSource {
        fn source_type(&self) -> SourceType {
            SourceType::Snapshot
        }

        async fn get_last_prices(&self, _: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
            Err(TraitError::ConnectionFailed("host unreachable".into()))
        }
    }

    #[tokio::test]
    async fn test_fetch_resolved() {
        let quotes = PriceQuotes::try_from_pairs([("0050.TW", dec!(150)), ("2330.TW", dec!(900))])
            .unwrap();
        let source = FixedSource(quotes);

        let feed = fetch_price_feed(&source, &["0050.TW".into()]).await;
        let quotes = feed.quotes().unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes.get(&"0050.TW".into()), Some(dec!(150)));
    }

    #[tokio::test]
    async fn test_fetch_unavailable() {
        let feed = fetch_price_feed(&DownSource, &["0050.TW".into()]).await;
        match feed {
            PriceFeed::Unavailable { reason } => assert!(reason.contains("host unreachable")),
            PriceFeed::Resolved(_) => panic!("expected unavailable feed"),
        }
    }

    #[tokio::test]
    async fn test_boxed_source() {
        let source: Box<dyn PriceSource> = Box::new(DownSource);
        assert_eq!(source.source_type(), SourceType::Snapshot);
        assert!(!fetch_price_feed(&source, &[]).await.is_resolved());
    }
}
