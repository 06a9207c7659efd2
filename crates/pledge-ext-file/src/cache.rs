//! TTL cache in front of another price source.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

use pledge_core::{PriceQuotes, QuoteSymbol};
use pledge_traits::error::TraitError;
use pledge_traits::market_data::{PriceSource, SourceType};

/// Default validity window for cached prices.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy)]
struct CachedPrice {
    price: Decimal,
    fetched_at: Instant,
}

/// Caches the last price per symbol for a fixed time-to-live.
///
/// Only symbols that are missing or expired are requested from the inner
/// source. Symbols the inner source omits are not cached.
pub struct CachedPriceSource<S> {
    inner: S,
    ttl: Duration,
    entries: DashMap<QuoteSymbol, CachedPrice>,
}

impl<S: PriceSource> CachedPriceSource<S> {
    /// Wrap `inner` with the default ten-minute TTL.
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    /// Wrap `inner` with an explicit TTL.
    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Validity window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drops every cached price.
    pub fn invalidate(&self) {
        self.entries.clear();
    }

    /// Number of cached entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh(&self, symbol: &QuoteSymbol, now: Instant) -> Option<Decimal> {
        self.entries
            .get(symbol)
            .filter(|e| now.duration_since(e.fetched_at) < self.ttl)
            .map(|e| e.price)
    }
}

#[async_trait]
impl<S: PriceSource> PriceSource for CachedPriceSource<S> {
    fn source_type(&self) -> SourceType {
        SourceType::Cache
    }

    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        let now = Instant::now();
        let mut quotes = PriceQuotes::new();
        let mut stale = Vec::new();

        for symbol in symbols {
            match self.fresh(symbol, now) {
                Some(price) => quotes.try_insert(symbol.clone(), price)?,
                None => stale.push(symbol.clone()),
            }
        }

        tracing::debug!(hits = quotes.len(), misses = stale.len(), "price cache lookup");
        if stale.is_empty() {
            return Ok(quotes);
        }

        let fetched = self.inner.get_last_prices(&stale).await?;
        let fetched_at = Instant::now();
        for (symbol, price) in fetched.iter() {
            self.entries
                .insert(symbol.clone(), CachedPrice { price, fetched_at });
        }
        quotes.merge(fetched);
        Ok(quotes)
    }
}
