//! In-memory and file-based price sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Deserialize;

use pledge_core::{PriceQuotes, QuoteSymbol};
use pledge_traits::error::TraitError;
use pledge_traits::market_data::{PriceSource, SourceType};

fn parse_price(symbol: &str, raw: &str) -> Result<Decimal, TraitError> {
    let price = Decimal::from_str(raw.trim())
        .map_err(|e| TraitError::ParseError(format!("{symbol}: price {raw:?}: {e}")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(TraitError::ParseError(format!(
            "{symbol}: negative price {price}"
        )));
    }
    Ok(price)
}

fn lookup(prices: &DashMap<QuoteSymbol, Decimal>, symbols: &[QuoteSymbol]) -> PriceQuotes {
    let mut quotes = PriceQuotes::new();
    for symbol in symbols {
        if let Some(price) = prices.get(symbol) {
            // stored prices are validated on load
            let _ = quotes.try_insert(symbol.clone(), *price);
        }
    }
    quotes
}

// =============================================================================
// STATIC PRICE SOURCE
// =============================================================================

/// Fixed in-memory prices, e.g. from `--price` flags.
pub struct StaticPriceSource {
    quotes: PriceQuotes,
}

impl StaticPriceSource {
    /// Create a source serving `quotes`.
    pub fn new(quotes: PriceQuotes) -> Self {
        Self { quotes }
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::Manual
    }

    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        Ok(self.quotes.restricted_to(symbols))
    }
}

/// Source that knows no prices.
pub struct EmptyPriceSource;

#[async_trait]
impl PriceSource for EmptyPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::Manual
    }

    async fn get_last_prices(&self, _symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        Ok(PriceQuotes::new())
    }
}

/// Replaces the loaded set with a fully parsed one.
///
/// Symbols missing from `fresh` are dropped and the rest overwritten in place,
/// so a symbol present in both sets stays visible to concurrent lookups.
fn replace_prices(prices: &DashMap<QuoteSymbol, Decimal>, fresh: HashMap<QuoteSymbol, Decimal>) {
    prices.retain(|symbol, _| fresh.contains_key(symbol));
    for (symbol, price) in fresh {
        prices.insert(symbol, price);
    }
}

// =============================================================================
// CSV PRICE SOURCE
// =============================================================================

/// CSV record for prices.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    symbol: String,
    #[serde(alias = "last_price")]
    price: String,
}

/// CSV-based price source with `symbol,price` columns.
///
/// Symbols are matched as written after trimming and upper-casing, so the
/// file must use quote symbols (`0050.TW`, not `0050`).
pub struct CsvPriceSource {
    file_path: PathBuf,
    prices: DashMap<QuoteSymbol, Decimal>,
}

impl CsvPriceSource {
    /// Create a new CSV price source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            prices: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload prices from file.
    pub fn reload(&self) -> Result<(), TraitError> {
        if !self.file_path.exists() {
            return Err(TraitError::NotFound(self.file_path.display().to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut fresh = HashMap::new();
        for result in reader.deserialize() {
            let record: PriceRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            if record.symbol.is_empty() {
                continue;
            }
            let price = parse_price(&record.symbol, &record.price)?;
            fresh.insert(QuoteSymbol::new(&record.symbol), price);
        }
        replace_prices(&self.prices, fresh);

        tracing::debug!(
            path = %self.file_path.display(),
            count = self.prices.len(),
            "loaded CSV prices"
        );
        Ok(())
    }

    /// Number of loaded prices.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns true if no price was loaded.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        Ok(lookup(&self.prices, symbols))
    }
}

// =============================================================================
// JSON PRICE SOURCE
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPrices {
    Map(HashMap<String, serde_json::Value>),
    Records(Vec<JsonRecord>),
}

#[derive(Deserialize)]
struct JsonRecord {
    symbol: String,
    #[serde(alias = "last_price")]
    price: serde_json::Value,
}

fn json_price(symbol: &str, value: &serde_json::Value) -> Result<Decimal, TraitError> {
    match value {
        serde_json::Value::Number(n) => parse_price(symbol, &n.to_string()),
        serde_json::Value::String(s) => parse_price(symbol, s),
        other => Err(TraitError::ParseError(format!(
            "{symbol}: expected a number, got {other}"
        ))),
    }
}

/// JSON-based price source.
///
/// Accepts either an object keyed by symbol (`{"0050.TW": 150.0}`) or an
/// array of `{"symbol": .., "price": ..}` records.
pub struct JsonPriceSource {
    file_path: PathBuf,
    prices: DashMap<QuoteSymbol, Decimal>,
}

impl JsonPriceSource {
    /// Create a new JSON price source.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            prices: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload prices from file.
    pub fn reload(&self) -> Result<(), TraitError> {
        let content = std::fs::read_to_string(&self.file_path)?;
        let parsed: JsonPrices =
            serde_json::from_str(&content).map_err(|e| TraitError::ParseError(e.to_string()))?;

        let pairs: Vec<(String, serde_json::Value)> = match parsed {
            JsonPrices::Map(map) => map.into_iter().collect(),
            JsonPrices::Records(records) => {
                records.into_iter().map(|r| (r.symbol, r.price)).collect()
            }
        };

        let mut fresh = HashMap::with_capacity(pairs.len());
        for (symbol, value) in pairs {
            let price = json_price(&symbol, &value)?;
            fresh.insert(QuoteSymbol::new(&symbol), price);
        }
        replace_prices(&self.prices, fresh);

        tracing::debug!(
            path = %self.file_path.display(),
            count = self.prices.len(),
            "loaded JSON prices"
        );
        Ok(())
    }
}

#[async_trait]
impl PriceSource for JsonPriceSource {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    async fn get_last_prices(&self, symbols: &[QuoteSymbol]) -> Result<PriceQuotes, TraitError> {
        Ok(lookup(&self.prices, symbols))
    }
}
